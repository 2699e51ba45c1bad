//! Turn states.

use crate::games::morris::{Node, Side};

/// Where the turn loop currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextState {
    /// Deciding who moves next.
    #[default]
    NextPlayer,
    /// Waiting for a move from the user interface.
    HumanTurn {
        /// Side to move.
        side: Side,
    },
    /// About to launch a search.
    ComputerTurnBegin {
        /// Side to move.
        side: Side,
    },
    /// A search is running in the background.
    ComputerTurnThinking {
        /// Side being searched for.
        side: Side,
    },
    /// A human move closed a mill and a capture must be picked.
    ApplyCapture {
        /// Side capturing.
        side: Side,
        /// Pieces that may be removed.
        candidates: Vec<Node>,
    },
    /// The game has ended.
    GameOver,
}

impl ContextState {
    /// Side the state is about, if any.
    pub fn side(&self) -> Option<Side> {
        match self {
            ContextState::HumanTurn { side }
            | ContextState::ComputerTurnBegin { side }
            | ContextState::ComputerTurnThinking { side }
            | ContextState::ApplyCapture { side, .. } => Some(*side),
            ContextState::NextPlayer | ContextState::GameOver => None,
        }
    }
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextState::NextPlayer => write!(f, "next player"),
            ContextState::HumanTurn { side } => write!(f, "{side} to move (human)"),
            ContextState::ComputerTurnBegin { side } => write!(f, "{side} to move (computer)"),
            ContextState::ComputerTurnThinking { side } => write!(f, "{side} thinking"),
            ContextState::ApplyCapture { side, candidates } => {
                let list: Vec<String> = candidates.iter().map(|n| n.to_string()).collect();
                write!(f, "{side} to capture one of [{}]", list.join(", "))
            }
            ContextState::GameOver => write!(f, "game over"),
        }
    }
}
