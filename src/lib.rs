//! Cube Painting Library
//!
//! Turns a painted 3x3x3 cube into the 54-character facelet string a two-phase
//! solver understands, rejecting impossible paint jobs before the solver sees them.
//!
//! The pieces, leaf first:
//! - [`palette`]: the six colors and their face letters.
//! - [`geometry`]: cubelet positions and face slots.
//! - [`state`]: immutable cube snapshots with a single paint operation.
//! - [`facelets`]: which slot feeds which character of the facelet string.
//! - [`encoder`]: snapshot to facelet string, with validation.
//! - [`solver`]: the contract with the external solver.
//! - [`orchestrator`] and [`session`]: sequencing solves and what a UI calls.

pub mod encoder;
pub mod facelets;
pub mod geometry;
pub mod orchestrator;
pub mod palette;
pub mod session;
pub mod solver;
pub mod state;

pub use encoder::{encode, EncodeError, ErrorKind};
pub use geometry::{Face, Position};
pub use orchestrator::{Orchestrator, Phase, SolveError, SolveOutcome, Solution};
pub use palette::{Color, FaceLetter, Sticker};
pub use session::Session;
pub use solver::{CommandSolver, Solver, SolverError};
pub use state::CubeState;
