//! Pluggable search algorithms.

use super::SearchResult;
use crate::games::morris::{Position, Side, rules};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

/// A move-search algorithm run on the worker thread.
///
/// The position arrives by value and the strategy must not touch shared
/// mutable game state. It is only called when `side` has a legal move.
pub trait Strategy: Send + Sync {
    /// Picks a move for `side` in `position`.
    fn search(&self, position: Position, side: Side) -> SearchResult;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Which strategy a match uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// [`FirstLegal`].
    FirstLegal,
    /// [`RandomMove`].
    Random,
    /// [`Minimax`](super::Minimax).
    #[default]
    Minimax,
}

/// Always plays the first move in generation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegal;

impl Strategy for FirstLegal {
    #[instrument(skip(self, position))]
    fn search(&self, position: Position, side: Side) -> SearchResult {
        let mut position = position;
        position.set_to_move(side);
        match rules::legal_moves(&position).first() {
            Some(mv) => SearchResult::from(*mv),
            None => {
                warn!("No legal move to pick");
                SearchResult::default()
            }
        }
    }

    fn name(&self) -> &str {
        "first_legal"
    }
}

/// Plays a uniformly random legal move.
#[derive(Debug)]
pub struct RandomMove {
    rng: Mutex<StdRng>,
}

impl RandomMove {
    /// Creates a strategy seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a reproducible strategy.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomMove {
    #[instrument(skip(self, position))]
    fn search(&self, position: Position, side: Side) -> SearchResult {
        let mut position = position;
        position.set_to_move(side);
        let moves = rules::legal_moves(&position);

        let picked = match self.rng.lock() {
            Ok(mut rng) => moves.choose(&mut *rng).copied(),
            Err(poisoned) => moves.choose(&mut *poisoned.into_inner()).copied(),
        };

        match picked {
            Some(mv) => {
                debug!(%mv, candidates = moves.len(), "Random pick");
                SearchResult::from(mv)
            }
            None => {
                warn!("No legal move to pick");
                SearchResult::default()
            }
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::morris::{Cell, Move, Node};

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    #[test]
    fn first_legal_picks_lowest_node_in_placement() {
        let result = FirstLegal.search(Position::new(), Side::White);
        assert_eq!(result.to_move(Side::White), Some(Move::place(Side::White, n(0))));
    }

    #[test]
    fn single_empty_node_is_the_only_choice() {
        let mut cells = [Cell::Occupied(Side::Black); 24];
        for index in [0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20] {
            cells[index] = Cell::Occupied(Side::White);
        }
        cells[23] = Cell::Empty;
        let position = Position::from_cells(cells, Side::White).with_in_hand(Side::White, 1);

        let result = RandomMove::seeded(7).search(position, Side::White);
        assert_eq!(result.place, Some(n(23)));
        assert_eq!(result.source, None);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let a = RandomMove::seeded(42).search(Position::new(), Side::White);
        let b = RandomMove::seeded(42).search(Position::new(), Side::White);
        assert_eq!(a, b);
    }

    #[test]
    fn kind_parses_from_config_names() {
        assert_eq!("first_legal".parse::<StrategyKind>(), Ok(StrategyKind::FirstLegal));
        assert_eq!(StrategyKind::Minimax.to_string(), "minimax");
    }
}
