//! Encoding a cube state into the canonical facelet string.
//!
//! [`encode`] walks [`FACELET_MAP`] in order, translates each slot through the
//! palette, and checks the result is well-formed input for a solver: every
//! facelet painted, nine of each color, and six distinct center colors. It does
//! not check that the cube is reachable by legal moves; that is left to the solver.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::facelets::{FACELETS_PER_FACE, FACELET_COUNT, FACELET_MAP};
use crate::geometry::{Face, Position};
use crate::palette::{Color, FaceLetter, Sticker};
use crate::state::CubeState;

/// Reason a cube state could not be encoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("cubelet {0} is missing from the cube state")]
    MissingPosition(Position),
    #[error("facelet {position} {face} holds {sticker}, which is not a palette color")]
    UnpaintedOrInvalidFacelet {
        position: Position,
        face: Face,
        sticker: Sticker,
    },
    #[error("{color} is the center color of both {first} and {second}")]
    DuplicateCenterColor {
        color: Color,
        first: FaceLetter,
        second: FaceLetter,
    },
    #[error("center {position} was visited as both {first} and {second}")]
    DuplicateCenterPosition {
        position: Position,
        first: FaceLetter,
        second: FaceLetter,
    },
    #[error("encoded {0} facelets, expected {expected}", expected = FACELET_COUNT)]
    WrongTotalLength(usize),
    #[error("{letter} appears {count} times, expected {}", FACELETS_PER_FACE)]
    WrongColorCount { letter: FaceLetter, count: usize },
    #[error("only {0} of 6 faces have a center color")]
    IncompleteCenterBinding(usize),
}

/// Who is responsible for an [`EncodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The fixed geometry or the state store broke an invariant. This is a bug.
    InternalFault,
    /// The user painted a cube that cannot exist. Repainting fixes it.
    UserData,
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::MissingPosition(_)
            | EncodeError::DuplicateCenterPosition { .. }
            | EncodeError::WrongTotalLength(_) => ErrorKind::InternalFault,
            EncodeError::UnpaintedOrInvalidFacelet { .. }
            | EncodeError::DuplicateCenterColor { .. }
            | EncodeError::WrongColorCount { .. }
            | EncodeError::IncompleteCenterBinding(_) => ErrorKind::UserData,
        }
    }
}

/// Center color bindings collected during one encoding pass.
#[derive(Default)]
struct CenterBindings {
    color_to_letter: FxHashMap<Color, FaceLetter>,
    letter_to_color: FxHashMap<FaceLetter, Color>,
    position_to_letter: FxHashMap<Position, FaceLetter>,
}

impl CenterBindings {
    fn bind(
        &mut self,
        position: Position,
        letter: FaceLetter,
        color: Color,
    ) -> Result<(), EncodeError> {
        if let Some(&first) = self.position_to_letter.get(&position) {
            if first != letter {
                return Err(EncodeError::DuplicateCenterPosition {
                    position,
                    first,
                    second: letter,
                });
            }
        }
        if let Some(&first) = self.color_to_letter.get(&color) {
            if first != letter {
                return Err(EncodeError::DuplicateCenterColor {
                    color,
                    first,
                    second: letter,
                });
            }
        }

        self.position_to_letter.insert(position, letter);
        self.color_to_letter.insert(color, letter);
        self.letter_to_color.insert(letter, color);
        Ok(())
    }
}

/// Returns whether a cubelet is a face center, i.e. shows exactly one slot.
#[inline]
fn is_center(cubelet: &[Sticker; 6]) -> bool {
    cubelet.iter().filter(|sticker| !sticker.is_internal()).count() == 1
}

/// Encodes a cube state as the 54-character canonical facelet string.
///
/// Faces appear in `U R F D L B` order, nine letters each, in raster order.
pub fn encode(state: &CubeState) -> Result<String, EncodeError> {
    let mut output = String::with_capacity(FACELET_COUNT);
    let mut counts = [0usize; 6];
    let mut bindings = CenterBindings::default();

    for record in &FACELET_MAP {
        let cubelet = state
            .get(record.position)
            .ok_or(EncodeError::MissingPosition(record.position))?;

        let sticker = cubelet[record.face.index()];
        let Sticker::Painted(color) = sticker else {
            return Err(EncodeError::UnpaintedOrInvalidFacelet {
                position: record.position,
                face: record.face,
                sticker,
            });
        };

        let letter = color.letter();
        output.push(letter.as_char());
        counts[letter.ordinal()] += 1;

        if is_center(cubelet) {
            bindings.bind(record.position, record.letter, color)?;
        }
    }

    if output.len() != FACELET_COUNT {
        return Err(EncodeError::WrongTotalLength(output.len()));
    }
    for letter in FaceLetter::ALL {
        let count = counts[letter.ordinal()];
        if count != FACELETS_PER_FACE {
            return Err(EncodeError::WrongColorCount { letter, count });
        }
    }
    if bindings.letter_to_color.len() != FaceLetter::ALL.len() {
        return Err(EncodeError::IncompleteCenterBinding(
            bindings.letter_to_color.len(),
        ));
    }

    Ok(output)
}

/// Lays out a canonical facelet string as an unfolded cube net.
///
/// U sits above F, D below it, and L, F, R, B run left to right in the middle band.
/// Returns `None` if `facelets` is not 54 characters long.
pub fn format_net(facelets: &str) -> Option<String> {
    let chars: Vec<char> = facelets.chars().collect();
    if chars.len() != FACELET_COUNT {
        return None;
    }

    let row_of = |letter: FaceLetter, row: usize| -> String {
        let start = letter.ordinal() * FACELETS_PER_FACE + row * 3;
        chars[start..start + 3].iter().collect()
    };

    let mut output = String::new();
    for row in 0..3 {
        output.push_str("    ");
        output.push_str(&row_of(FaceLetter::U, row));
        output.push('\n');
    }
    for row in 0..3 {
        let band: Vec<String> = [FaceLetter::L, FaceLetter::F, FaceLetter::R, FaceLetter::B]
            .into_iter()
            .map(|letter| row_of(letter, row))
            .collect();
        output.push_str(&band.join(" "));
        output.push('\n');
    }
    for row in 0..3 {
        output.push_str("    ");
        output.push_str(&row_of(FaceLetter::D, row));
        output.push('\n');
    }

    Some(output)
}
