//! Game rules for Nine Men's Morris.
//!
//! Pure functions over [`Position`](super::Position) snapshots. The live
//! board and the search strategies share them, so both agree on which moves
//! exist and what they do.

pub mod ending;
pub mod graph;
pub mod movegen;

pub use ending::{MAX_PLIES_WITHOUT_MILL, ending};
pub use graph::{MILLS, are_adjacent, freedom, in_mill, neighbors};
pub use movegen::{
    can_fly, capture_candidates, has_any_move, legal_moves, play, validate, validate_complete,
};
