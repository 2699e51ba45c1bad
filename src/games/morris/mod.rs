//! Nine Men's Morris: position model, rules and the live board.

mod action;
mod board;
mod phases;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use board::{Applied, Board, BoardView};
pub use phases::{EndReason, Ending, Outcome};
pub use types::{Cell, NODE_COUNT, Node, PIECES_PER_SIDE, Position, Side};
