//! Move search: strategies and the background worker that runs them.

mod minimax;
mod result;
mod strategy;
mod worker;

pub use minimax::{Minimax, evaluate};
pub use result::SearchResult;
pub use strategy::{FirstLegal, RandomMove, Strategy, StrategyKind};
pub use worker::{SearchWorker, WorkerMode};

use std::sync::Arc;

/// Builds a shared strategy from its kind.
///
/// `depth` only affects [`Minimax`]; `seed` only affects [`RandomMove`].
pub fn build_strategy(kind: StrategyKind, depth: u8, seed: Option<u64>) -> Arc<dyn Strategy> {
    match kind {
        StrategyKind::FirstLegal => Arc::new(FirstLegal),
        StrategyKind::Random => match seed {
            Some(seed) => Arc::new(RandomMove::seeded(seed)),
            None => Arc::new(RandomMove::new()),
        },
        StrategyKind::Minimax => Arc::new(Minimax::new(depth)),
    }
}
