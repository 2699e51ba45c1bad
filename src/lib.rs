//! Morris core - turn orchestration for Nine Men's Morris
//!
//! This library decides whose turn it is, takes human moves from a user
//! interface and runs computer moves on a background thread so the frame
//! loop never blocks.
//!
//! # Architecture
//!
//! - **Games**: position model, rules and the reference board
//! - **Search**: pluggable strategies and the single-flight search worker
//! - **Context**: the turn state machine driven once per frame
//! - **Config**: TOML match settings and the command-line surface
//!
//! # Example
//!
//! ```no_run
//! use morris_core::{ContextState, ControlMode, GameContext, Minimax};
//! use std::sync::Arc;
//!
//! let mut ctx = GameContext::new(
//!     ControlMode::Computer,
//!     ControlMode::Computer,
//!     Arc::new(Minimax::new(2)),
//! );
//! while ctx.state() != &ContextState::GameOver {
//!     ctx.update();
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod context;
mod games;
mod search;

// Crate-level exports - Command line
pub use cli::{COMMAND_HELP, Cli, Command, PlayArgs, UserCommand};

// Crate-level exports - Configuration
pub use config::{ConfigError, MatchConfig};

// Crate-level exports - Turn orchestration
pub use context::{ContextError, ContextState, ControlMode, GameContext};

// Crate-level exports - Search
pub use search::{
    FirstLegal, Minimax, RandomMove, SearchResult, SearchWorker, Strategy, StrategyKind,
    WorkerMode, build_strategy, evaluate,
};

// Crate-level exports - Game types (Nine Men's Morris)
pub use games::morris::{
    Applied, Board, BoardView, Cell, EndReason, Ending, Move, MoveError, NODE_COUNT, Node,
    Outcome, PIECES_PER_SIDE, Position, Side, rules,
};
