//! Sequencing the external solver.
//!
//! The orchestrator moves through `Idle → Initializing → Ready → Solving → Ready`,
//! or ends in `Faulted` if the solver fails to initialize. Only one solve may be in
//! flight; a second request is turned away with [`SolveError::Busy`] rather than
//! queued. Every solve encodes the snapshot it was given before awaiting anything,
//! so edits made while the solver runs cannot reach the string already sent.

use std::cell::{Cell, RefCell};
use std::fmt;

use thiserror::Error;

use crate::encoder::{encode, EncodeError, ErrorKind};
use crate::solver::{classify_failure, FailureClass, Solver, SolverError};
use crate::state::CubeState;

/// Lifecycle phase of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initializing,
    Ready,
    Solving,
    /// The solver failed to initialize. Terminal.
    Faulted,
}

/// A move sequence returned by the solver, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    moves: String,
}

impl Solution {
    pub fn as_str(&self) -> &str {
        &self.moves
    }

    /// Iterates over the individual moves.
    pub fn moves(&self) -> impl Iterator<Item = &str> + '_ {
        self.moves.split_whitespace()
    }

    pub fn move_count(&self) -> usize {
        self.moves().count()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.moves)
    }
}

/// Successful result of a solve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    AlreadySolved,
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Solved(solution) => {
                write!(f, "{solution} ({} moves)", solution.move_count())
            }
            SolveOutcome::AlreadySolved => f.write_str("already solved"),
        }
    }
}

/// Reason a solve request did not produce a solution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("a solve is already in progress")]
    Busy,
    #[error("the solver is still starting")]
    NotReady,
    #[error("solver unavailable: {0}")]
    SolverUnavailable(SolverError),
    #[error("internal error while encoding the cube: {0}")]
    InternalFault(EncodeError),
    #[error("invalid cube: {0}")]
    InvalidCube(EncodeError),
    #[error("the solver rejected the cube definition: {0}")]
    InvalidCubeDefinition(SolverError),
    #[error("the cube cannot be solved, pieces are permuted or twisted: {0}")]
    Permutation(SolverError),
    #[error("the solver failed: {0}")]
    SolverFailed(SolverError),
}

impl From<EncodeError> for SolveError {
    fn from(error: EncodeError) -> Self {
        match error.kind() {
            ErrorKind::InternalFault => SolveError::InternalFault(error),
            ErrorKind::UserData => SolveError::InvalidCube(error),
        }
    }
}

impl From<SolverError> for SolveError {
    fn from(error: SolverError) -> Self {
        match classify_failure(&error) {
            FailureClass::InvalidCubeDefinition => SolveError::InvalidCubeDefinition(error),
            FailureClass::Permutation => SolveError::Permutation(error),
            FailureClass::Other => SolveError::SolverFailed(error),
        }
    }
}

/// Returns the phase to `Ready` when a solve finishes or is dropped mid-flight.
struct SolvingGuard<'a>(&'a Cell<Phase>);

impl Drop for SolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(Phase::Ready);
    }
}

/// Drives a [`Solver`] through initialization and one-at-a-time solving.
pub struct Orchestrator<S> {
    solver: S,
    phase: Cell<Phase>,
    init_error: RefCell<Option<SolverError>>,
}

impl<S: Solver> Orchestrator<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            phase: Cell::new(Phase::Idle),
            init_error: RefCell::new(None),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Initializes the solver. Does nothing unless the orchestrator is `Idle`.
    pub async fn start(&self) {
        if self.phase.get() != Phase::Idle {
            log::debug!("ignoring start in phase {:?}", self.phase.get());
            return;
        }
        self.phase.set(Phase::Initializing);
        log::debug!("initializing solver");

        match self.solver.init().await {
            Ok(()) => {
                log::info!("solver ready");
                self.phase.set(Phase::Ready);
            }
            Err(e) => {
                log::error!("solver failed to initialize: {e}");
                *self.init_error.borrow_mut() = Some(e);
                self.phase.set(Phase::Faulted);
            }
        }
    }

    /// Encodes `snapshot` and asks the solver for a solution.
    pub async fn solve(&self, snapshot: &CubeState) -> Result<SolveOutcome, SolveError> {
        match self.phase.get() {
            Phase::Ready => {}
            Phase::Solving => {
                log::warn!("rejecting solve request: a solve is already in flight");
                return Err(SolveError::Busy);
            }
            Phase::Idle | Phase::Initializing => return Err(SolveError::NotReady),
            Phase::Faulted => {
                let error = self
                    .init_error
                    .borrow()
                    .clone()
                    .unwrap_or_else(|| SolverError::new("initialization failed"));
                return Err(SolveError::SolverUnavailable(error));
            }
        }

        self.phase.set(Phase::Solving);
        let _guard = SolvingGuard(&self.phase);

        let facelets = encode(snapshot).map_err(|e| {
            match e.kind() {
                ErrorKind::InternalFault => log::error!("cube state broke an invariant: {e}"),
                ErrorKind::UserData => log::info!("not solving invalid cube: {e}"),
            }
            SolveError::from(e)
        })?;

        log::debug!("solving {facelets}");
        let moves = self.solver.solve(&facelets).await.map_err(|e| {
            log::info!("solver failed: {e}");
            SolveError::from(e)
        })?;

        let moves = moves.trim();
        if moves.is_empty() {
            log::info!("cube is already solved");
            Ok(SolveOutcome::AlreadySolved)
        } else {
            log::info!("solver returned {moves}");
            Ok(SolveOutcome::Solved(Solution {
                moves: moves.to_owned(),
            }))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::future::Future;
    use std::pin::{pin, Pin};
    use std::task::{Context, Poll, Waker};

    use super::*;
    use crate::geometry::{Face, Position};
    use crate::palette::Color;

    /// Solver with canned replies that records every facelet string it receives.
    pub(crate) struct FakeSolver {
        pub init_reply: Result<(), SolverError>,
        pub solve_reply: Result<String, SolverError>,
        pub received: RefCell<Vec<String>>,
        /// While false, `solve` stays pending.
        pub open: Cell<bool>,
    }

    impl FakeSolver {
        pub(crate) fn replying(solve_reply: Result<String, SolverError>) -> Self {
            Self {
                init_reply: Ok(()),
                solve_reply,
                received: RefCell::new(Vec::new()),
                open: Cell::new(true),
            }
        }

        pub(crate) fn gated(solve_reply: Result<String, SolverError>) -> Self {
            let solver = Self::replying(solve_reply);
            solver.open.set(false);
            solver
        }
    }

    struct Gate<'a>(&'a Cell<bool>);

    impl Future for Gate<'_> {
        type Output = ();

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.0.get() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        }
    }

    impl Solver for FakeSolver {
        async fn init(&self) -> Result<(), SolverError> {
            self.init_reply.clone()
        }

        async fn solve(&self, facelets: &str) -> Result<String, SolverError> {
            self.received.borrow_mut().push(facelets.to_owned());
            Gate(&self.open).await;
            self.solve_reply.clone()
        }
    }

    /// Polls a future once without a runtime.
    pub(crate) fn poll_once<F: Future>(future: Pin<&mut F>) -> Poll<F::Output> {
        future.poll(&mut Context::from_waker(Waker::noop()))
    }

    fn ready(solver: FakeSolver) -> Orchestrator<FakeSolver> {
        let orchestrator = Orchestrator::new(solver);
        pollster::block_on(orchestrator.start());
        orchestrator
    }

    fn scrambled() -> CubeState {
        let corner = Position::new(1, 1, 1).unwrap();
        CubeState::initial()
            .with_facelet_set(corner, Face::PosY, Color::Red)
            .with_facelet_set(corner, Face::PosX, Color::Green)
            .with_facelet_set(corner, Face::PosZ, Color::White)
    }

    #[test]
    fn test_start_reaches_ready() {
        let orchestrator = Orchestrator::new(FakeSolver::replying(Ok(String::new())));
        assert_eq!(orchestrator.phase(), Phase::Idle);
        pollster::block_on(orchestrator.start());
        assert_eq!(orchestrator.phase(), Phase::Ready);
    }

    #[test]
    fn test_solve_before_start_is_not_ready() {
        let orchestrator = Orchestrator::new(FakeSolver::replying(Ok(String::new())));
        let result = pollster::block_on(orchestrator.solve(&CubeState::initial()));
        assert_eq!(result, Err(SolveError::NotReady));
    }

    #[test]
    fn test_init_failure_is_terminal() {
        let mut solver = FakeSolver::replying(Ok(String::new()));
        solver.init_reply = Err(SolverError::new("tables missing"));
        let orchestrator = Orchestrator::new(solver);

        pollster::block_on(orchestrator.start());
        assert_eq!(orchestrator.phase(), Phase::Faulted);

        // no retry
        pollster::block_on(orchestrator.start());
        assert_eq!(orchestrator.phase(), Phase::Faulted);

        let result = pollster::block_on(orchestrator.solve(&CubeState::initial()));
        assert_eq!(
            result,
            Err(SolveError::SolverUnavailable(SolverError::new("tables missing")))
        );
        assert!(orchestrator.solver().received.borrow().is_empty());
    }

    #[test]
    fn test_solution_is_passed_through() {
        let orchestrator = ready(FakeSolver::replying(Ok("R U R' U' \n".to_owned())));
        let outcome = pollster::block_on(orchestrator.solve(&scrambled())).unwrap();

        let SolveOutcome::Solved(solution) = outcome else {
            panic!("expected a solution, got {outcome:?}");
        };
        assert_eq!(solution.as_str(), "R U R' U'");
        assert_eq!(solution.moves().collect::<Vec<_>>(), ["R", "U", "R'", "U'"]);
        assert_eq!(solution.move_count(), 4);
        assert_eq!(orchestrator.phase(), Phase::Ready);
    }

    #[test]
    fn test_empty_reply_is_already_solved() {
        let orchestrator = ready(FakeSolver::replying(Ok(String::new())));
        let outcome = pollster::block_on(orchestrator.solve(&CubeState::initial()));
        assert_eq!(outcome, Ok(SolveOutcome::AlreadySolved));
        assert_eq!(
            orchestrator.solver().received.borrow().as_slice(),
            ["UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"]
        );
    }

    #[test]
    fn test_invalid_cube_never_reaches_solver() {
        let orchestrator = ready(FakeSolver::replying(Ok(String::new())));
        let state = CubeState::initial().with_facelet_set(
            Position::new(0, 0, 1).unwrap(),
            Face::PosZ,
            Color::White,
        );

        let result = pollster::block_on(orchestrator.solve(&state));
        assert!(
            matches!(
                result,
                Err(SolveError::InvalidCube(EncodeError::DuplicateCenterColor { .. }))
            ),
            "{result:?}"
        );
        assert!(orchestrator.solver().received.borrow().is_empty());
        assert_eq!(orchestrator.phase(), Phase::Ready);
    }

    #[test]
    fn test_structural_fault_is_internal() {
        let orchestrator = ready(FakeSolver::replying(Ok(String::new())));
        let state = CubeState::from_cubelets(std::iter::empty());
        let result = pollster::block_on(orchestrator.solve(&state));
        assert!(
            matches!(result, Err(SolveError::InternalFault(EncodeError::MissingPosition(_)))),
            "{result:?}"
        );
    }

    #[test]
    fn test_solver_failures_are_classified() {
        let cases = [
            ("Error: invalid cube definition", "definition"),
            ("Error 6: corner permutation parity", "permutation"),
            ("segfault in table loader", "other"),
        ];
        for (message, expected) in cases {
            let orchestrator = ready(FakeSolver::replying(Err(SolverError::new(message))));
            let result = pollster::block_on(orchestrator.solve(&scrambled()));
            let actual = match result {
                Err(SolveError::InvalidCubeDefinition(_)) => "definition",
                Err(SolveError::Permutation(_)) => "permutation",
                Err(SolveError::SolverFailed(_)) => "other",
                other => panic!("unexpected result {other:?}"),
            };
            assert_eq!(actual, expected, "{message}");
            assert_eq!(orchestrator.phase(), Phase::Ready);
        }
    }

    #[test]
    fn test_concurrent_solve_is_busy() {
        let orchestrator = ready(FakeSolver::gated(Ok("F2".to_owned())));
        let state = scrambled();

        let mut first = pin!(orchestrator.solve(&state));
        assert!(poll_once(first.as_mut()).is_pending());
        assert_eq!(orchestrator.phase(), Phase::Solving);

        let second = pollster::block_on(orchestrator.solve(&state));
        assert_eq!(second, Err(SolveError::Busy));
        assert_eq!(orchestrator.solver().received.borrow().len(), 1);

        orchestrator.solver().open.set(true);
        let Poll::Ready(result) = poll_once(first.as_mut()) else {
            panic!("solve should finish once the gate opens");
        };
        assert!(matches!(result, Ok(SolveOutcome::Solved(_))));
        assert_eq!(orchestrator.phase(), Phase::Ready);
    }

    #[test]
    fn test_dropped_solve_releases_busy_guard() {
        let orchestrator = ready(FakeSolver::gated(Ok("F2".to_owned())));
        let state = scrambled();
        {
            let mut pending = pin!(orchestrator.solve(&state));
            assert!(poll_once(pending.as_mut()).is_pending());
            assert_eq!(orchestrator.phase(), Phase::Solving);
        }
        assert_eq!(orchestrator.phase(), Phase::Ready);
    }
}
