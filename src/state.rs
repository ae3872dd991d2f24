//! The cube state store.
//!
//! A [`CubeState`] is an immutable snapshot of all 26 cubelets. Painting a slot
//! produces a new snapshot and leaves the old one untouched, so the renderer and
//! the encoder can hold different snapshots without coordinating.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::geometry::{Face, Position, POSITIONS};
use crate::palette::{Color, Sticker};

/// The six slot values of a cubelet, indexed by [`Face::index`].
pub type Cubelet = [Sticker; 6];

/// Snapshot of every cubelet's face slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState {
    cubelets: Arc<FxHashMap<Position, Cubelet>>,
}

/// Builds the solved slot array for a position.
fn solved_cubelet(position: Position) -> Cubelet {
    Face::ALL.map(|face| {
        if position.is_visible(face) {
            Sticker::Painted(face.solved_color())
        } else {
            Sticker::Internal
        }
    })
}

impl CubeState {
    /// Returns the solved cube.
    pub fn initial() -> Self {
        let cubelets = POSITIONS
            .iter()
            .map(|&position| (position, solved_cubelet(position)))
            .collect();
        Self {
            cubelets: Arc::new(cubelets),
        }
    }

    /// Builds a state from raw cubelets without checking any invariant.
    ///
    /// Missing positions and misplaced internal slots are kept as given.
    pub fn from_cubelets(cubelets: impl IntoIterator<Item = (Position, Cubelet)>) -> Self {
        Self {
            cubelets: Arc::new(cubelets.into_iter().collect()),
        }
    }

    /// Returns a copy of this state with one slot painted.
    ///
    /// Internal slots cannot be painted; for those (and for positions absent from
    /// the state) this returns a state equal to `self`.
    pub fn with_facelet_set(&self, position: Position, face: Face, color: Color) -> Self {
        let Some(cubelet) = self.cubelets.get(&position) else {
            log::warn!("ignoring paint of {position}: position not in state");
            return self.clone();
        };
        if cubelet[face.index()].is_internal() {
            log::trace!("ignoring paint of internal slot {position} {face}");
            return self.clone();
        }

        let mut cubelets = (*self.cubelets).clone();
        if let Some(slots) = cubelets.get_mut(&position) {
            slots[face.index()] = Sticker::Painted(color);
        }
        Self {
            cubelets: Arc::new(cubelets),
        }
    }

    /// Returns the slots of one cubelet.
    pub fn get(&self, position: Position) -> Option<&Cubelet> {
        self.cubelets.get(&position)
    }

    /// Returns the value of a single slot.
    pub fn sticker(&self, position: Position, face: Face) -> Option<Sticker> {
        self.get(position).map(|cubelet| cubelet[face.index()])
    }

    /// Iterates over cubelets in [`POSITIONS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cubelet)> + '_ {
        POSITIONS
            .iter()
            .filter_map(|&position| self.get(position).map(|cubelet| (position, cubelet)))
    }

    /// Number of cubelets (26 for any state built by painting).
    pub fn len(&self) -> usize {
        self.cubelets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubelets.is_empty()
    }

    /// Returns whether every visible slot shows its solved color.
    pub fn is_solved_coloring(&self) -> bool {
        *self == Self::initial()
    }

    /// Returns whether two snapshots share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cubelets, &other.cubelets)
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::initial()
    }
}
