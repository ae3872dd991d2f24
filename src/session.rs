//! The core side of the UI: what a front end calls when the user acts.
//!
//! A [`Session`] owns the current cube snapshot, the orchestrator, and the result
//! currently shown to the user. Editing or resetting the cube clears the shown
//! result at once. A solve still in flight is not cancelled, but its result is
//! dropped when it arrives if the cube was edited in the meantime.

use std::cell::{Cell, Ref, RefCell};

use crate::geometry::{Face, Position};
use crate::orchestrator::{Orchestrator, Phase, SolveError, SolveOutcome};
use crate::palette::Color;
use crate::solver::Solver;
use crate::state::CubeState;

/// Result shown to the user after a solve request.
pub type Displayed = Result<SolveOutcome, SolveError>;

/// The cube being painted and the solve result shown for it.
pub struct Session<S> {
    orchestrator: Orchestrator<S>,
    state: RefCell<CubeState>,
    displayed: RefCell<Option<Displayed>>,
    /// Bumped on every edit and reset so late solve results can be recognized.
    generation: Cell<u64>,
}

impl<S: Solver> Session<S> {
    pub fn new(solver: S) -> Self {
        Self {
            orchestrator: Orchestrator::new(solver),
            state: RefCell::new(CubeState::initial()),
            displayed: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Initializes the solver. Call once at startup.
    pub async fn start(&self) {
        self.orchestrator.start().await;
    }

    pub fn phase(&self) -> Phase {
        self.orchestrator.phase()
    }

    pub fn orchestrator(&self) -> &Orchestrator<S> {
        &self.orchestrator
    }

    /// Returns the current cube snapshot.
    pub fn snapshot(&self) -> CubeState {
        self.state.borrow().clone()
    }

    /// Returns the solution or error currently shown, if any.
    pub fn displayed(&self) -> Ref<'_, Option<Displayed>> {
        self.displayed.borrow()
    }

    /// Paints one facelet. Returns whether the cube changed.
    ///
    /// Clicks on internal slots are ignored.
    pub fn notify_facelet_clicked(&self, position: Position, face: Face, color: Color) -> bool {
        let next = self.state.borrow().with_facelet_set(position, face, color);
        if next.ptr_eq(&self.state.borrow()) {
            return false;
        }
        log::debug!("painted {position} {face} {color}");
        *self.state.borrow_mut() = next;
        self.invalidate();
        true
    }

    /// Restores the solved cube and clears the shown result.
    pub fn notify_reset_requested(&self) {
        log::debug!("reset requested");
        *self.state.borrow_mut() = CubeState::initial();
        self.invalidate();
    }

    /// Solves the current snapshot.
    ///
    /// Returns the result that is now displayed, or `None` if the cube was edited
    /// or reset while the solver ran and the result was discarded. A request made
    /// while another solve is running returns `Busy` and leaves the display alone.
    pub async fn notify_solve_requested(&self) -> Option<Displayed> {
        let snapshot = self.snapshot();
        let generation = self.generation.get();

        let result = self.orchestrator.solve(&snapshot).await;
        if result == Err(SolveError::Busy) {
            return Some(result);
        }
        if self.generation.get() != generation {
            log::info!("discarding solve result for an outdated cube");
            return None;
        }

        *self.displayed.borrow_mut() = Some(result.clone());
        Some(result)
    }

    fn invalidate(&self) {
        self.generation.set(self.generation.get() + 1);
        *self.displayed.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use std::pin::pin;
    use std::task::Poll;

    use super::*;
    use crate::encoder::EncodeError;
    use crate::orchestrator::tests::{poll_once, FakeSolver};
    use crate::solver::SolverError;

    fn pos(x: i8, y: i8, z: i8) -> Position {
        Position::new(x, y, z).unwrap()
    }

    fn started(solver: FakeSolver) -> Session<FakeSolver> {
        let session = Session::new(solver);
        pollster::block_on(session.start());
        session
    }

    fn twist_corner(session: &Session<FakeSolver>) {
        let corner = pos(1, 1, 1);
        session.notify_facelet_clicked(corner, Face::PosY, Color::Red);
        session.notify_facelet_clicked(corner, Face::PosX, Color::Green);
        session.notify_facelet_clicked(corner, Face::PosZ, Color::White);
    }

    #[test]
    fn test_click_paints_and_reset_restores() {
        let session = started(FakeSolver::replying(Ok(String::new())));
        assert!(session.notify_facelet_clicked(pos(-1, 1, 0), Face::NegX, Color::Blue));
        assert!(!session.snapshot().is_solved_coloring());

        session.notify_reset_requested();
        assert!(session.snapshot().is_solved_coloring());
    }

    #[test]
    fn test_internal_click_is_ignored() {
        let session = started(FakeSolver::replying(Ok(String::new())));
        assert!(!session.notify_facelet_clicked(pos(0, 0, -1), Face::PosZ, Color::Red));
        assert!(session.snapshot().is_solved_coloring());
    }

    #[test]
    fn test_already_solved_is_displayed() {
        let session = started(FakeSolver::replying(Ok(String::new())));
        let result = pollster::block_on(session.notify_solve_requested());
        assert_eq!(result, Some(Ok(SolveOutcome::AlreadySolved)));
        assert_eq!(*session.displayed(), Some(Ok(SolveOutcome::AlreadySolved)));
    }

    #[test]
    fn test_edit_clears_displayed_result() {
        let session = started(FakeSolver::replying(Err(SolverError::new("bad permutation"))));
        twist_corner(&session);
        let result = pollster::block_on(session.notify_solve_requested());
        assert!(matches!(result, Some(Err(SolveError::Permutation(_)))));
        assert!(session.displayed().is_some());

        session.notify_facelet_clicked(pos(1, 1, 1), Face::PosY, Color::White);
        assert!(session.displayed().is_none());
    }

    #[test]
    fn test_validation_error_is_displayed() {
        let session = started(FakeSolver::replying(Ok(String::new())));
        session.notify_facelet_clicked(pos(0, 1, 1), Face::PosY, Color::Green);
        let result = pollster::block_on(session.notify_solve_requested());
        assert!(matches!(
            result,
            Some(Err(SolveError::InvalidCube(EncodeError::WrongColorCount { .. })))
        ));
        assert!(session.orchestrator().solver().received.borrow().is_empty());
    }

    #[test]
    fn test_in_flight_solve_uses_request_snapshot() {
        let session = started(FakeSolver::gated(Ok("R".to_owned())));
        twist_corner(&session);
        let requested = crate::encoder::encode(&session.snapshot()).unwrap();

        let mut solve = pin!(session.notify_solve_requested());
        assert!(poll_once(solve.as_mut()).is_pending());

        // edit while the solver is running
        session.notify_facelet_clicked(pos(1, 1, 1), Face::PosY, Color::White);
        assert_eq!(
            session.orchestrator().solver().received.borrow().as_slice(),
            [requested]
        );

        session.orchestrator().solver().open.set(true);
        let Poll::Ready(result) = poll_once(solve.as_mut()) else {
            panic!("solve should finish once the gate opens");
        };
        assert_eq!(result, None, "stale result must be discarded");
        assert!(session.displayed().is_none());
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_reset_during_solve_discards_result() {
        let session = started(FakeSolver::gated(Ok("R".to_owned())));
        twist_corner(&session);

        let mut solve = pin!(session.notify_solve_requested());
        assert!(poll_once(solve.as_mut()).is_pending());
        session.notify_reset_requested();

        // a second request while the first is in flight is turned away
        let busy = pollster::block_on(session.notify_solve_requested());
        assert_eq!(busy, Some(Err(SolveError::Busy)));

        session.orchestrator().solver().open.set(true);
        assert_eq!(poll_once(solve.as_mut()), Poll::Ready(None));
        assert!(session.displayed().is_none());
    }
}
