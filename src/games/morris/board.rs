//! Live game state with history.
//!
//! [`Board`] owns the current [`Position`], the played moves and any capture
//! still owed by a human player. Search and turn logic only see it through
//! [`BoardView`].

use super::rules;
use super::{Ending, Move, MoveError, Node, Outcome, Position, Side};
use tracing::{debug, info, instrument};

/// Read-only board contract used by the search worker and the turn logic.
pub trait BoardView {
    /// Point-in-time copy of the current position.
    fn position(&self) -> Position;

    /// Side whose turn it is.
    fn turn(&self) -> Side;

    /// True once the game has ended.
    fn is_terminal(&self) -> bool;
}

/// Result of applying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The move was applied and the turn passed.
    Complete,
    /// The move closed a mill and the mover must pick a capture.
    AwaitingCapture {
        /// Opponent pieces that may be removed.
        candidates: Vec<Node>,
    },
}

#[derive(Debug, Clone)]
struct PendingCapture {
    before: Position,
    mv: Move,
    candidates: Vec<Node>,
}

/// Reference board with standard Nine Men's Morris rules.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    history: Vec<(Position, Move)>,
    redo: Vec<Move>,
    pending: Option<PendingCapture>,
    ending: Option<Ending>,
}

impl Board {
    /// Creates a board at the starting position.
    #[instrument]
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Creates a board starting from an arbitrary position.
    pub fn from_position(position: Position) -> Self {
        let mut board = Self {
            position,
            history: Vec::new(),
            redo: Vec::new(),
            pending: None,
            ending: None,
        };
        board.refresh_ending();
        board
    }

    /// Validates and applies a move.
    ///
    /// A move that closes a mill without naming a capture is held until
    /// [`Board::capture`] completes it.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn apply(&mut self, mv: Move) -> Result<Applied, MoveError> {
        if self.ending.is_some() {
            return Err(MoveError::GameOver);
        }
        if self.pending.is_some() {
            return Err(MoveError::CapturePending);
        }

        match rules::validate(&self.position, &mv)? {
            None => {
                self.commit(mv);
                Ok(Applied::Complete)
            }
            Some(candidates) => {
                let before = self.position;
                let mut shown = rules::play(&before, mv);
                shown.set_to_move(mv.side());
                self.position = shown;
                debug!(candidates = candidates.len(), "Mill closed, awaiting capture");
                self.pending = Some(PendingCapture {
                    before,
                    mv,
                    candidates: candidates.clone(),
                });
                Ok(Applied::AwaitingCapture { candidates })
            }
        }
    }

    /// Completes a held move by removing the piece on `node`.
    #[instrument(skip(self))]
    pub fn capture(&mut self, node: Node) -> Result<(), MoveError> {
        let pending = self.pending.take().ok_or(MoveError::NoPendingCapture)?;
        if !pending.candidates.contains(&node) {
            self.pending = Some(pending);
            return Err(MoveError::IllegalCapture(node));
        }

        self.position = pending.before;
        self.commit(pending.mv.with_capture(node));
        Ok(())
    }

    /// Applies a move that must already be complete, such as a search result.
    pub fn apply_complete(&mut self, mv: Move) -> Result<(), MoveError> {
        if self.ending.is_some() {
            return Err(MoveError::GameOver);
        }
        if self.pending.is_some() {
            return Err(MoveError::CapturePending);
        }
        rules::validate_complete(&self.position, &mv)?;
        self.commit(mv);
        Ok(())
    }

    /// Takes back the last move, or drops a held move awaiting capture.
    ///
    /// Returns the move taken back.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Option<Move> {
        if let Some(pending) = self.pending.take() {
            self.position = pending.before;
            return Some(pending.mv);
        }

        let (before, mv) = self.history.pop()?;
        self.position = before;
        self.redo.push(mv);
        self.refresh_ending();
        debug!(%mv, "Undone");
        Some(mv)
    }

    /// Replays the last move taken back.
    #[instrument(skip(self))]
    pub fn redo(&mut self) -> Option<Move> {
        if self.pending.is_some() {
            return None;
        }
        let mv = self.redo.pop()?;
        let before = self.position;
        self.position = rules::play(&before, mv);
        self.history.push((before, mv));
        self.refresh_ending();
        debug!(%mv, "Redone");
        Some(mv)
    }

    /// Returns true if there is a move to take back.
    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || !self.history.is_empty()
    }

    /// Returns true if there is a move to replay.
    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && !self.redo.is_empty()
    }

    /// Capture candidates while a move is held, `None` otherwise.
    pub fn pending_capture(&self) -> Option<&[Node]> {
        self.pending.as_ref().map(|p| p.candidates.as_slice())
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|(_, mv)| mv)
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.ending.is_some() || self.pending.is_some() {
            return Vec::new();
        }
        rules::legal_moves(&self.position)
    }

    /// How the game ended, if it has.
    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    /// Outcome of the game, if it has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.ending.map(|end| end.outcome)
    }

    /// Restores the starting position and clears history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Renders the board as ASCII art.
    ///
    /// `W` and `B` mark pieces, `o` marks empty nodes.
    pub fn display(&self) -> String {
        const TEMPLATE: &str = "\
@-----------@-----------@
|           |           |
|   @-------@-------@   |
|   |       |       |   |
|   |   @---@---@   |   |
|   |   |       |   |   |
@---@---@       @---@---@
|   |   |       |   |   |
|   |   @---@---@   |   |
|   |       |       |   |
|   @-------@-------@   |
|           |           |
@-----------@-----------@";

        let mut nodes = Node::all();
        let mut out: String = TEMPLATE
            .chars()
            .map(|ch| match ch {
                '@' => match nodes.next().and_then(|node| self.position.owner(node)) {
                    Some(Side::White) => 'W',
                    Some(Side::Black) => 'B',
                    None => 'o',
                },
                other => other,
            })
            .collect();

        out.push_str(&format!(
            "\n{} to move | in hand W:{} B:{}",
            self.position.to_move(),
            self.position.in_hand(Side::White),
            self.position.in_hand(Side::Black),
        ));
        if let Some(ending) = self.ending {
            out.push_str(&format!("\n{ending}"));
        }
        out
    }

    fn commit(&mut self, mv: Move) {
        let before = self.position;
        self.position = rules::play(&before, mv);
        self.history.push((before, mv));
        self.redo.clear();
        self.refresh_ending();
        debug!(%mv, "Move applied");
        if let Some(ending) = self.ending {
            info!(%ending, "Game over");
        }
    }

    fn refresh_ending(&mut self) {
        self.ending = rules::ending(&self.position).or_else(|| self.repetition());
    }

    /// Threefold repetition, counted over movement-phase positions only.
    fn repetition(&self) -> Option<Ending> {
        if self.position.is_placement_phase() {
            return None;
        }
        let seen = 1 + self
            .history
            .iter()
            .filter(|(before, _)| {
                !before.is_placement_phase() && before.same_arrangement(&self.position)
            })
            .count();
        (seen >= 3).then_some(Ending {
            outcome: Outcome::Draw,
            reason: super::EndReason::Repetition,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView for Board {
    fn position(&self) -> Position {
        self.position
    }

    fn turn(&self) -> Side {
        self.position.to_move()
    }

    fn is_terminal(&self) -> bool {
        self.ending.is_some()
    }
}
