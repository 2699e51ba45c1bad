//! Turn orchestration.
//!
//! [`GameContext`] owns the board and the search worker and advances one
//! step per [`GameContext::update`] call. Human moves are pushed in with
//! [`GameContext::submit_move`] and [`GameContext::submit_capture`];
//! computer moves come from the worker without ever blocking the caller.

mod control;
mod state;

pub use control::ControlMode;
pub use state::ContextState;

use crate::games::morris::{Applied, Board, BoardView, Move, MoveError, Node, Side};
use crate::search::{SearchWorker, Strategy};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Error returned by [`GameContext`] operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ContextError {
    /// Input arrived while the state does not accept a move from that side.
    #[display("Not a human turn for {}", _0)]
    NotHumanTurn(#[error(not(source))] Side),

    /// A capture was submitted while none is owed.
    #[display("No capture is awaited")]
    NotAwaitingCapture,

    /// The operation is not allowed while a capture is owed.
    #[display("A capture must be made first")]
    CaptureInProgress,

    /// The board rejected the move.
    #[display("Illegal move: {}", _0)]
    #[from]
    Move(#[error(source)] MoveError),
}

/// Turn state machine for one match.
pub struct GameContext {
    board: Board,
    worker: SearchWorker,
    modes: [ControlMode; 2],
    strategies: [Arc<dyn Strategy>; 2],
    state: ContextState,
}

impl GameContext {
    /// Creates a context at the starting position.
    ///
    /// Both sides search with `strategy` when under computer control.
    #[instrument(skip(strategy), fields(strategy = strategy.name()))]
    pub fn new(white: ControlMode, black: ControlMode, strategy: Arc<dyn Strategy>) -> Self {
        Self {
            board: Board::new(),
            worker: SearchWorker::new(),
            modes: [white, black],
            strategies: [Arc::clone(&strategy), strategy],
            state: ContextState::NextPlayer,
        }
    }

    /// Replaces the search worker.
    pub fn with_worker(mut self, worker: SearchWorker) -> Self {
        self.worker = worker;
        self
    }

    /// Replaces the board, for starting from a prepared position.
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self.state = ContextState::NextPlayer;
        self
    }

    /// Gives `side` its own strategy.
    pub fn set_strategy(&mut self, side: Side, strategy: Arc<dyn Strategy>) {
        self.strategies[side.index()] = strategy;
    }

    /// Advances the state machine by at most one transition.
    ///
    /// Never blocks: a running search is only polled.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn update(&mut self) {
        match self.state.clone() {
            ContextState::NextPlayer => self.next_player(),
            ContextState::ComputerTurnBegin { side } => {
                let strategy = Arc::clone(&self.strategies[side.index()]);
                info!(%side, strategy = strategy.name(), "Computer thinking");
                self.worker.start(&self.board, strategy);
                self.state = ContextState::ComputerTurnThinking { side };
            }
            ContextState::ComputerTurnThinking { side } => {
                if !self.worker.is_running() {
                    self.finish_search(side);
                }
            }
            ContextState::HumanTurn { .. }
            | ContextState::ApplyCapture { .. }
            | ContextState::GameOver => {}
        }
    }

    /// Plays a move for the human side to move.
    ///
    /// A move that closes a mill without naming a capture either captures
    /// the only candidate or waits in [`ContextState::ApplyCapture`].
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn submit_move(&mut self, mv: Move) -> Result<(), ContextError> {
        match &self.state {
            ContextState::HumanTurn { side } if *side == mv.side() => {}
            ContextState::ApplyCapture { .. } => return Err(ContextError::CaptureInProgress),
            _ => return Err(ContextError::NotHumanTurn(mv.side())),
        }

        match self.board.apply(mv)? {
            Applied::Complete => self.after_move(),
            Applied::AwaitingCapture { candidates } => {
                if let [only] = candidates.as_slice() {
                    debug!(capture = %only, "Single capture candidate, taking it");
                    self.board.capture(*only)?;
                    self.after_move();
                } else {
                    self.state = ContextState::ApplyCapture {
                        side: mv.side(),
                        candidates,
                    };
                }
            }
        }
        Ok(())
    }

    /// Completes a mill by removing the piece on `node`.
    #[instrument(skip(self))]
    pub fn submit_capture(&mut self, node: Node) -> Result<(), ContextError> {
        if !matches!(self.state, ContextState::ApplyCapture { .. }) {
            return Err(ContextError::NotAwaitingCapture);
        }
        self.board.capture(node)?;
        self.after_move();
        Ok(())
    }

    /// Changes who controls `side`.
    ///
    /// A running search is joined and its result discarded first.
    #[instrument(skip(self))]
    pub fn set_control_mode(&mut self, side: Side, mode: ControlMode) -> Result<(), ContextError> {
        if matches!(self.state, ContextState::ApplyCapture { .. }) {
            return Err(ContextError::CaptureInProgress);
        }

        self.stop_search();
        self.modes[side.index()] = mode;
        if self.state != ContextState::GameOver {
            self.state = ContextState::NextPlayer;
        }
        info!(%side, %mode, "Control mode changed");
        Ok(())
    }

    /// Takes back the last move.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Option<Move>, ContextError> {
        if matches!(self.state, ContextState::ApplyCapture { .. }) {
            return Err(ContextError::CaptureInProgress);
        }
        self.stop_search();
        let undone = self.board.undo();
        self.state = ContextState::NextPlayer;
        Ok(undone)
    }

    /// Replays the last move taken back.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Result<Option<Move>, ContextError> {
        if matches!(self.state, ContextState::ApplyCapture { .. }) {
            return Err(ContextError::CaptureInProgress);
        }
        self.stop_search();
        let redone = self.board.redo();
        self.state = ContextState::NextPlayer;
        Ok(redone)
    }

    /// Starts a new match with the same controllers.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.stop_search();
        self.board.reset();
        self.state = ContextState::NextPlayer;
        info!("New match");
    }

    /// Current state.
    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// Side being searched for, while a search runs.
    pub fn thinking_side(&self) -> Option<Side> {
        match self.state {
            ContextState::ComputerTurnThinking { side } => Some(side),
            _ => None,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The search worker.
    pub fn worker(&self) -> &SearchWorker {
        &self.worker
    }

    /// Controller of `side`.
    pub fn control_mode(&self, side: Side) -> ControlMode {
        self.modes[side.index()]
    }

    fn next_player(&mut self) {
        if self.board.is_terminal() {
            if let Some(ending) = self.board.ending() {
                info!(%ending, "Game over");
            }
            self.state = ContextState::GameOver;
            return;
        }

        let side = self.board.turn();
        match self.control_mode(side) {
            ControlMode::Human => self.state = ContextState::HumanTurn { side },
            ControlMode::Computer => self.state = ContextState::ComputerTurnBegin { side },
            ControlMode::None => debug!(%side, "Side has no controller, idling"),
        }
    }

    fn finish_search(&mut self, side: Side) {
        let decided = self.worker.get_result().and_then(|result| result.to_move(side));

        let applied = match decided {
            Some(mv) => match self.board.apply_complete(mv) {
                Ok(()) => {
                    info!(%mv, "Computer moved");
                    true
                }
                Err(e) => {
                    warn!(%mv, error = %e, "Search returned an illegal move");
                    false
                }
            },
            None => {
                warn!(%side, "Search returned no usable move");
                false
            }
        };

        if !applied {
            self.play_fallback(side);
        }
        self.after_move();
    }

    fn play_fallback(&mut self, side: Side) {
        let Some(mv) = self.board.legal_moves().first().copied() else {
            error!(%side, "No legal move for fallback");
            return;
        };
        match self.board.apply_complete(mv) {
            Ok(()) => warn!(%mv, "Played fallback move"),
            Err(e) => error!(%mv, error = %e, "Fallback move rejected"),
        }
    }

    fn after_move(&mut self) {
        self.state = if self.board.is_terminal() {
            ContextState::GameOver
        } else {
            ContextState::NextPlayer
        };
    }

    fn stop_search(&mut self) {
        if let ContextState::ComputerTurnThinking { side } = self.state {
            debug!(%side, "Joining running search");
            self.worker.join();
            let _ = self.worker.get_result();
        }
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("state", &self.state)
            .field("modes", &self.modes)
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FirstLegal;

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    #[test]
    fn move_errors_convert_with_source() {
        let err: ContextError = MoveError::GameOver.into();
        assert_eq!(err, ContextError::Move(MoveError::GameOver));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn human_side_waits_for_input() {
        let mut ctx = GameContext::new(ControlMode::Human, ControlMode::Human, Arc::new(FirstLegal));
        ctx.update();
        assert_eq!(ctx.state(), &ContextState::HumanTurn { side: Side::White });
        ctx.update();
        assert_eq!(ctx.state(), &ContextState::HumanTurn { side: Side::White });
        assert_eq!(ctx.worker().searches_started(), 0);
    }

    #[test]
    fn input_for_wrong_side_is_rejected() {
        let mut ctx = GameContext::new(ControlMode::Human, ControlMode::Human, Arc::new(FirstLegal));
        ctx.update();
        assert_eq!(
            ctx.submit_move(Move::place(Side::Black, n(0))),
            Err(ContextError::NotHumanTurn(Side::Black))
        );
        assert_eq!(ctx.submit_capture(n(0)), Err(ContextError::NotAwaitingCapture));
    }

    #[test]
    fn no_controller_idles() {
        let mut ctx = GameContext::new(ControlMode::None, ControlMode::Human, Arc::new(FirstLegal));
        for _ in 0..3 {
            ctx.update();
        }
        assert_eq!(ctx.state(), &ContextState::NextPlayer);
    }
}
