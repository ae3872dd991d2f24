//! Palette colors, face letters, and the table binding them together.
//!
//! The palette is the only place that knows which color belongs to which face
//! letter. Everything else converts through [`PALETTE`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the six sticker colors a user can paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Orange,
    Green,
    Red,
    Blue,
    Yellow,
}

/// Face letter used by the canonical facelet string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceLetter {
    U,
    R,
    F,
    D,
    L,
    B,
}

/// Value held by one face slot of a cubelet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sticker {
    /// The slot points into the cube and can never be painted.
    Internal,
    Painted(Color),
}

/// Hex code shown for internal slots.
pub const INTERNAL_HEX: &str = "#333333";

/// A row of the palette table.
#[derive(Debug, Clone, Copy)]
pub struct PaletteEntry {
    pub color: Color,
    pub letter: FaceLetter,
    pub name: &'static str,
    pub hex: &'static str,
}

/// The palette, in the order colors are offered to the user.
///
/// Each color appears exactly once and each face letter appears exactly once.
pub static PALETTE: [PaletteEntry; 6] = [
    PaletteEntry {
        color: Color::White,
        letter: FaceLetter::U,
        name: "white",
        hex: "#FFFFFF",
    },
    PaletteEntry {
        color: Color::Orange,
        letter: FaceLetter::L,
        name: "orange",
        hex: "#FFA500",
    },
    PaletteEntry {
        color: Color::Green,
        letter: FaceLetter::F,
        name: "green",
        hex: "#008000",
    },
    PaletteEntry {
        color: Color::Red,
        letter: FaceLetter::R,
        name: "red",
        hex: "#FF0000",
    },
    PaletteEntry {
        color: Color::Blue,
        letter: FaceLetter::B,
        name: "blue",
        hex: "#0000FF",
    },
    PaletteEntry {
        color: Color::Yellow,
        letter: FaceLetter::D,
        name: "yellow",
        hex: "#FFFF00",
    },
];

impl Color {
    /// All palette colors in palette order.
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Orange,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::Yellow,
    ];

    #[inline]
    fn entry(self) -> &'static PaletteEntry {
        // PALETTE is laid out in declaration order of `Color`
        &PALETTE[self as usize]
    }

    /// Returns the face letter this color stands for.
    pub fn letter(self) -> FaceLetter {
        self.entry().letter
    }

    /// Lowercase palette name, e.g. `green`.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// `#RRGGBB` hex code.
    pub fn hex(self) -> &'static str {
        self.entry().hex
    }

    /// Returns the color as RGB components in `0.0..=1.0`.
    pub fn rgb(self) -> (f32, f32, f32) {
        hex_to_rgb(self.hex())
    }
}

impl FaceLetter {
    /// Face letters in canonical string order.
    pub const ALL: [FaceLetter; 6] = [
        FaceLetter::U,
        FaceLetter::R,
        FaceLetter::F,
        FaceLetter::D,
        FaceLetter::L,
        FaceLetter::B,
    ];

    /// Returns the palette color bound to this face letter.
    pub fn color(self) -> Color {
        PALETTE
            .iter()
            .find(|entry| entry.letter == self)
            .map(|entry| entry.color)
            .unwrap_or_else(|| unreachable!("palette covers every face letter"))
    }

    /// Position of this face in the canonical string (0 for U .. 5 for B).
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub const fn as_char(self) -> char {
        match self {
            FaceLetter::U => 'U',
            FaceLetter::R => 'R',
            FaceLetter::F => 'F',
            FaceLetter::D => 'D',
            FaceLetter::L => 'L',
            FaceLetter::B => 'B',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(FaceLetter::U),
            'R' => Some(FaceLetter::R),
            'F' => Some(FaceLetter::F),
            'D' => Some(FaceLetter::D),
            'L' => Some(FaceLetter::L),
            'B' => Some(FaceLetter::B),
            _ => None,
        }
    }
}

impl Sticker {
    /// Returns the face letter for a painted slot, `None` for internal slots.
    pub fn letter(self) -> Option<FaceLetter> {
        match self {
            Sticker::Internal => None,
            Sticker::Painted(color) => Some(color.letter()),
        }
    }

    pub fn is_internal(self) -> bool {
        self == Sticker::Internal
    }

    pub fn hex(self) -> &'static str {
        match self {
            Sticker::Internal => INTERNAL_HEX,
            Sticker::Painted(color) => color.hex(),
        }
    }

    pub fn rgb(self) -> (f32, f32, f32) {
        hex_to_rgb(self.hex())
    }
}

/// Parses a `#RRGGBB` string into RGB components.
///
/// Only palette and sentinel hex codes reach this, so malformed input maps to black.
fn hex_to_rgb(hex: &str) -> (f32, f32, f32) {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .map_or(0.0, |value| value as f32 / 255.0)
    };
    (channel(1..3), channel(3..5), channel(5..7))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FaceLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for Sticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sticker::Internal => write!(f, "internal ({INTERNAL_HEX})"),
            Sticker::Painted(color) => write!(f, "{color} ({})", color.hex()),
        }
    }
}

/// Error returned when text does not name a palette color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color {0:?}, expected a palette name, face letter, or hex code")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    /// Accepts a palette name (`green`), a face letter (`F`), or a hex code (`#008000`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(letter) = FaceLetter::from_char(c.to_ascii_uppercase()) {
                return Ok(letter.color());
            }
        }
        PALETTE
            .iter()
            .find(|entry| {
                entry.name.eq_ignore_ascii_case(trimmed) || entry.hex.eq_ignore_ascii_case(trimmed)
            })
            .map(|entry| entry.color)
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}
