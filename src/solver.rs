//! The contract with the external solving algorithm.
//!
//! The solver is a black box: it takes a canonical facelet string and returns a
//! whitespace-separated move sequence, or an empty string if the cube is already
//! solved. Its failures carry nothing but a message, which [`classify_failure`]
//! sorts into the few categories the user needs to tell apart.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Failure reported by a solver. Only the message is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverError {
    message: String,
}

impl SolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SolverError {}

/// An external cube-solving algorithm.
///
/// Implementations are driven from a single thread, so futures need not be `Send`.
/// Nothing here spawns work elsewhere: a solver that blocks inside `solve` blocks
/// its caller (and the painter window) until it returns.
#[allow(async_fn_in_trait)]
pub trait Solver {
    /// Prepares the solver. Called once, before any call to [`Solver::solve`].
    async fn init(&self) -> Result<(), SolverError>;

    /// Solves a 54-character canonical facelet string.
    ///
    /// Returns the moves separated by whitespace, or an empty string when the
    /// cube is already solved.
    async fn solve(&self, facelets: &str) -> Result<String, SolverError>;
}

/// Category of a solver failure, derived from its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The solver rejected the facelet string itself.
    InvalidCubeDefinition,
    /// The pieces cannot be reached by legal moves (twisted corner, flipped edge, parity).
    Permutation,
    Other,
}

/// Classifies a solver failure by the substrings its message is known to contain.
pub fn classify_failure(error: &SolverError) -> FailureClass {
    let message = error.message().to_ascii_lowercase();
    if message.contains("invalid cube definition") {
        FailureClass::InvalidCubeDefinition
    } else if message.contains("permutation") {
        FailureClass::Permutation
    } else {
        FailureClass::Other
    }
}

/// Canonical string of the solved cube, used to check a solver responds.
const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// A solver run as an external program.
///
/// The facelet string is passed as the last argument. The program must print the
/// move sequence on stdout and exit successfully; output starting with `Error` or
/// a failing exit status is reported as a [`SolverError`].
///
/// The program runs to completion on the calling thread, so its futures are ready
/// the first time they are polled.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments passed before the facelet string.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn run(&self, facelets: &str) -> Result<String, SolverError> {
        log::debug!("running {} on {facelets}", self.program.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(facelets)
            .output()
            .map_err(|e| {
                SolverError::new(format!("could not run {}: {e}", self.program.display()))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            let message = if stderr.is_empty() { stdout } else { stderr };
            return Err(SolverError::new(format!(
                "{} exited with {}: {message}",
                self.program.display(),
                output.status,
            )));
        }
        if stdout.starts_with("Error") {
            return Err(SolverError::new(stdout));
        }
        Ok(stdout)
    }
}

impl Solver for CommandSolver {
    async fn init(&self) -> Result<(), SolverError> {
        let moves = self.run(SOLVED_FACELETS)?;
        log::debug!("{} answered solved cube with {moves:?}", self.program.display());
        Ok(())
    }

    async fn solve(&self, facelets: &str) -> Result<String, SolverError> {
        self.run(facelets)
    }
}
