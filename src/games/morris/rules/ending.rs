//! Terminal position detection.

use super::super::{EndReason, Ending, Outcome, Position, Side};
use super::movegen::has_any_move;
use strum::IntoEnumIterator;

/// Movement plies without a capture after which the game is drawn.
pub const MAX_PLIES_WITHOUT_MILL: u8 = 40;

/// Checks whether a position is terminal on its own.
///
/// Repetition needs the game history and is detected by the board.
pub fn ending(position: &Position) -> Option<Ending> {
    if let Some(loser) = Side::iter().find(|side| position.material(*side) < 3) {
        return Some(Ending {
            outcome: Outcome::Winner(loser.opponent()),
            reason: EndReason::TooFewPieces,
        });
    }

    if position.plies_without_mill() >= MAX_PLIES_WITHOUT_MILL {
        return Some(Ending {
            outcome: Outcome::Draw,
            reason: EndReason::NoMills,
        });
    }

    if !has_any_move(position) {
        return Some(Ending {
            outcome: Outcome::Winner(position.to_move().opponent()),
            reason: EndReason::Blocked,
        });
    }

    None
}
