//! The facelet position map.
//!
//! Lists the 54 visible facelets in the order the canonical facelet string uses:
//! faces in `U R F D L B` order, each face read row by row from its top-left
//! corner as seen from outside the cube. U is read with the back edge on top, D
//! with the front edge on top, and the four side faces with the U edge on top.
//!
//! This table is the only place that ties geometry to string order.

use std::fmt::Write;

use crate::geometry::{Face, Position};
use crate::palette::FaceLetter;

/// Number of facelets on each face.
pub const FACELETS_PER_FACE: usize = 9;

/// Total number of visible facelets.
pub const FACELET_COUNT: usize = 54;

/// One visible facelet: which face letter it belongs to and which slot shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceletRecord {
    pub letter: FaceLetter,
    pub position: Position,
    pub face: Face,
}

impl FaceletRecord {
    /// Raster cell of this facelet within its face, 0 (top-left) to 8 (bottom-right).
    pub const fn cell(&self) -> usize {
        let (x, y, z) = (self.position.x(), self.position.y(), self.position.z());
        let (row, col) = match self.letter {
            FaceLetter::U => (z, x),
            FaceLetter::R => (-y, -z),
            FaceLetter::F => (-y, x),
            FaceLetter::D => (-z, x),
            FaceLetter::L => (-y, z),
            FaceLetter::B => (-y, -x),
        };
        ((row + 1) * 3 + (col + 1)) as usize
    }

    /// Index of this facelet in the canonical string (and in [`FACELET_MAP`]).
    pub const fn index(&self) -> usize {
        self.letter.ordinal() * FACELETS_PER_FACE + self.cell()
    }
}

/// All facelets in canonical string order.
pub static FACELET_MAP: [FaceletRecord; FACELET_COUNT] = build_facelet_map();

/// Returns the cubelet slot that shows each face letter.
const fn slot_of(letter: FaceLetter) -> Face {
    match letter {
        FaceLetter::U => Face::PosY,
        FaceLetter::R => Face::PosX,
        FaceLetter::F => Face::PosZ,
        FaceLetter::D => Face::NegY,
        FaceLetter::L => Face::NegX,
        FaceLetter::B => Face::NegZ,
    }
}

/// Maps a raster cell of a face to the cubelet coordinates showing it.
///
/// `row` and `col` are offsets from the center cell, each in -1..=1, with row -1
/// at the top and col -1 at the left when viewing the face from outside.
const fn raster_to_coords(letter: FaceLetter, row: i8, col: i8) -> (i8, i8, i8) {
    match letter {
        FaceLetter::U => (col, 1, row),
        FaceLetter::R => (1, -row, -col),
        FaceLetter::F => (col, -row, 1),
        FaceLetter::D => (col, -1, -row),
        FaceLetter::L => (-1, -row, col),
        FaceLetter::B => (-col, -row, -1),
    }
}

/// Builds the facelet map at compile time.
const fn build_facelet_map() -> [FaceletRecord; FACELET_COUNT] {
    let placeholder = FaceletRecord {
        letter: FaceLetter::U,
        position: match Position::new(0, 1, 0) {
            Some(position) => position,
            None => panic!("U center must be a valid position"),
        },
        face: Face::PosY,
    };
    let mut map = [placeholder; FACELET_COUNT];

    let mut face_index = 0;
    while face_index < FaceLetter::ALL.len() {
        let letter = FaceLetter::ALL[face_index];
        let mut cell = 0;
        while cell < FACELETS_PER_FACE {
            let row = (cell / 3) as i8 - 1;
            let col = (cell % 3) as i8 - 1;
            let (x, y, z) = raster_to_coords(letter, row, col);
            let position = match Position::new(x, y, z) {
                Some(position) => position,
                None => panic!("raster cell maps outside the cube"),
            };
            map[face_index * FACELETS_PER_FACE + cell] = FaceletRecord {
                letter,
                position,
                face: slot_of(letter),
            };
            cell += 1;
        }
        face_index += 1;
    }
    map
}

/// Returns the index into the canonical string of the facelet at `(position, face)`.
///
/// Returns `None` for internal slots.
pub fn facelet_index_of(position: Position, face: Face) -> Option<usize> {
    FACELET_MAP
        .iter()
        .position(|record| record.position == position && record.face == face)
}

/// Returns the records belonging to one face, in raster order.
pub fn face_records(letter: FaceLetter) -> &'static [FaceletRecord] {
    let start = letter.ordinal() * FACELETS_PER_FACE;
    &FACELET_MAP[start..start + FACELETS_PER_FACE]
}

/// Formats the facelet map as a table, one facelet per line.
///
/// Facelets are named like `U1`..`U9`, numbered in raster order within the face.
pub fn format_facelet_map() -> String {
    let mut output = String::new();
    for (index, record) in FACELET_MAP.iter().enumerate() {
        // writing to a String cannot fail
        let _ = writeln!(
            output,
            "{:>2}  {}{}  {:<8}  {}",
            index,
            record.letter,
            record.cell() + 1,
            record.position.to_string(),
            record.face,
        );
    }
    output
}
