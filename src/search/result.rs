//! Search decision payload.

use crate::games::morris::{Move, Node, Side};
use serde::{Deserialize, Serialize};

/// Flat decision produced by a search.
///
/// `None` in a field means the decision does not use it. The worker
/// publishes exactly one of these per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Placement target.
    pub place: Option<Node>,
    /// Captured node.
    pub capture: Option<Node>,
    /// Relocation source.
    pub source: Option<Node>,
    /// Relocation destination.
    pub destination: Option<Node>,
}

impl SearchResult {
    /// Rebuilds the move for `side`.
    ///
    /// Returns `None` for combinations no move variant has, such as a
    /// placement together with a source, or an empty result.
    pub fn to_move(&self, side: Side) -> Option<Move> {
        match (self.place, self.source, self.destination, self.capture) {
            (Some(target), None, None, None) => Some(Move::place(side, target)),
            (Some(target), None, None, Some(capture)) => {
                Some(Move::place_take(side, target, capture))
            }
            (None, Some(source), Some(destination), None) => {
                Some(Move::relocate(side, source, destination))
            }
            (None, Some(source), Some(destination), Some(capture)) => {
                Some(Move::move_take(side, source, destination, capture))
            }
            _ => None,
        }
    }

    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Move> for SearchResult {
    fn from(mv: Move) -> Self {
        Self {
            place: mv.target(),
            capture: mv.capture(),
            source: mv.source(),
            destination: mv.destination(),
        }
    }
}
