//! Game outcome types.

use super::Side;
use serde::{Deserialize, Serialize};

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Side won the game.
    Winner(Side),
    /// Game ended in a draw.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Winner(side) => Some(*side),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{side} wins"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum EndReason {
    /// The loser has fewer than three pieces left.
    #[strum(to_string = "fewer than three pieces left")]
    TooFewPieces,
    /// The loser has no legal move.
    #[strum(to_string = "no legal move")]
    Blocked,
    /// Too many movement plies passed without a capture.
    #[strum(to_string = "no mill for too long")]
    NoMills,
    /// The same position arose three times.
    #[strum(to_string = "threefold repetition")]
    Repetition,
}

/// Outcome plus reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ending {
    /// Who won, if anyone.
    pub outcome: Outcome,
    /// What ended the game.
    pub reason: EndReason,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.outcome, self.reason)
    }
}
