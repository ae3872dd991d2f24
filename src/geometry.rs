//! Cubelet positions and face-slot axes.
//!
//! The puzzle is centered on the origin. Each axis coordinate is one of -1, 0, 1,
//! with +x pointing right, +y up, and +z toward the viewer (the front face).
//! The hidden core at (0, 0, 0) is not a cubelet, leaving 26 positions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::palette::Color;

/// A cubelet position, with every coordinate in -1..=1 and not all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    x: i8,
    y: i8,
    z: i8,
}

impl Position {
    /// Creates a position, returning `None` for out-of-range coordinates or the core.
    pub const fn new(x: i8, y: i8, z: i8) -> Option<Self> {
        if x < -1 || x > 1 || y < -1 || y > 1 || z < -1 || z > 1 {
            return None;
        }
        if x == 0 && y == 0 && z == 0 {
            return None;
        }
        Some(Self { x, y, z })
    }

    /// Coordinate along the left-right axis.
    pub const fn x(self) -> i8 {
        self.x
    }

    pub const fn y(self) -> i8 {
        self.y
    }

    pub const fn z(self) -> i8 {
        self.z
    }

    /// Returns the coordinate along the given face's axis.
    pub const fn along(self, face: Face) -> i8 {
        match face {
            Face::PosX | Face::NegX => self.x,
            Face::PosY | Face::NegY => self.y,
            Face::PosZ | Face::NegZ => self.z,
        }
    }

    /// Returns whether the slot facing `face` is on the outer surface.
    #[inline]
    pub const fn is_visible(self, face: Face) -> bool {
        self.along(face) == face.sign()
    }

    /// Number of externally visible slots: 1 for centers, 2 for edges, 3 for corners.
    pub const fn visible_count(self) -> usize {
        (self.x.unsigned_abs() + self.y.unsigned_abs() + self.z.unsigned_abs()) as usize
    }
}

/// All 26 cubelet positions, x-major then y then z.
pub static POSITIONS: [Position; 26] = build_positions();

const fn build_positions() -> [Position; 26] {
    let mut positions = [Position { x: 0, y: 0, z: 1 }; 26];
    let mut count = 0;

    let mut cell = 0;
    while cell < 27 {
        let x = (cell / 9) as i8 - 1;
        let y = ((cell / 3) % 3) as i8 - 1;
        let z = (cell % 3) as i8 - 1;
        if !(x == 0 && y == 0 && z == 0) {
            positions[count] = Position { x, y, z };
            count += 1;
        }
        cell += 1;
    }
    positions
}

/// Face slot of a cubelet, in slot index order `{+x, -x, +y, -y, +z, -z}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    /// All faces in slot index order.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Slot index in 0..6.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Face::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 6 {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// +1 for the positive half-axis, -1 for the negative one.
    pub const fn sign(self) -> i8 {
        match self {
            Face::PosX | Face::PosY | Face::PosZ => 1,
            Face::NegX | Face::NegY | Face::NegZ => -1,
        }
    }

    /// Unit normal of this face.
    pub const fn normal(self) -> (i8, i8, i8) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Color this face shows on a solved cube.
    pub const fn solved_color(self) -> Color {
        match self {
            Face::PosX => Color::Red,
            Face::NegX => Color::Orange,
            Face::PosY => Color::White,
            Face::NegY => Color::Yellow,
            Face::PosZ => Color::Green,
            Face::NegZ => Color::Blue,
        }
    }
}

impl fmt::Display for Position {
    /// Formats as `x_y_z`, e.g. `1_-1_0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.x, self.y, self.z)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::PosX => "+x",
            Face::NegX => "-x",
            Face::PosY => "+y",
            Face::NegY => "-y",
            Face::PosZ => "+z",
            Face::NegZ => "-z",
        };
        f.write_str(name)
    }
}

/// Error produced when parsing a position key or face slot index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid position key {0:?}, expected x_y_z with coordinates in -1..=1")]
    Position(String),
    #[error("invalid face slot {0:?}, expected an index in 0..6")]
    Face(String),
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Position(s.to_owned());
        let mut coords = s.trim().split('_').map(|part| part.parse::<i8>());
        let (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) =
            (coords.next(), coords.next(), coords.next(), coords.next())
        else {
            return Err(invalid());
        };
        Position::new(x, y, z).ok_or_else(invalid)
    }
}

impl FromStr for Face {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(Face::from_index)
            .ok_or_else(|| ParseError::Face(s.to_owned()))
    }
}
