//! First-class move types for Nine Men's Morris.
//!
//! A move is one ply. Each variant carries exactly the nodes it touches,
//! so a move with unused or garbage fields cannot be built.

use super::{Node, Side};
use serde::{Deserialize, Serialize};

/// A single ply: placement or relocation, optionally closing a mill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Place a new piece on an empty node.
    Place {
        /// The side placing.
        side: Side,
        /// Empty node receiving the piece.
        target: Node,
    },
    /// Relocate a piece along a connection (or anywhere when flying).
    Move {
        /// The side moving.
        side: Side,
        /// Node the piece leaves.
        source: Node,
        /// Empty node the piece lands on.
        destination: Node,
    },
    /// Placement that closes a mill and removes an opponent piece.
    PlaceTake {
        /// The side placing.
        side: Side,
        /// Empty node receiving the piece.
        target: Node,
        /// Opponent piece removed.
        capture: Node,
    },
    /// Relocation that closes a mill and removes an opponent piece.
    MoveTake {
        /// The side moving.
        side: Side,
        /// Node the piece leaves.
        source: Node,
        /// Empty node the piece lands on.
        destination: Node,
        /// Opponent piece removed.
        capture: Node,
    },
}

impl Move {
    /// Creates a placement.
    pub fn place(side: Side, target: Node) -> Self {
        Move::Place { side, target }
    }

    /// Creates a relocation.
    pub fn relocate(side: Side, source: Node, destination: Node) -> Self {
        Move::Move {
            side,
            source,
            destination,
        }
    }

    /// Creates a placement with capture.
    pub fn place_take(side: Side, target: Node, capture: Node) -> Self {
        Move::PlaceTake {
            side,
            target,
            capture,
        }
    }

    /// Creates a relocation with capture.
    pub fn move_take(side: Side, source: Node, destination: Node, capture: Node) -> Self {
        Move::MoveTake {
            side,
            source,
            destination,
            capture,
        }
    }

    /// Returns the side making this move.
    pub fn side(&self) -> Side {
        match *self {
            Move::Place { side, .. }
            | Move::Move { side, .. }
            | Move::PlaceTake { side, .. }
            | Move::MoveTake { side, .. } => side,
        }
    }

    /// Placement target, for `Place` and `PlaceTake`.
    pub fn target(&self) -> Option<Node> {
        match *self {
            Move::Place { target, .. } | Move::PlaceTake { target, .. } => Some(target),
            Move::Move { .. } | Move::MoveTake { .. } => None,
        }
    }

    /// Relocation source, for `Move` and `MoveTake`.
    pub fn source(&self) -> Option<Node> {
        match *self {
            Move::Move { source, .. } | Move::MoveTake { source, .. } => Some(source),
            Move::Place { .. } | Move::PlaceTake { .. } => None,
        }
    }

    /// Relocation destination, for `Move` and `MoveTake`.
    pub fn destination(&self) -> Option<Node> {
        match *self {
            Move::Move { destination, .. } | Move::MoveTake { destination, .. } => {
                Some(destination)
            }
            Move::Place { .. } | Move::PlaceTake { .. } => None,
        }
    }

    /// Captured node, for `PlaceTake` and `MoveTake`.
    pub fn capture(&self) -> Option<Node> {
        match *self {
            Move::PlaceTake { capture, .. } | Move::MoveTake { capture, .. } => Some(capture),
            Move::Place { .. } | Move::Move { .. } => None,
        }
    }

    /// Node where the moving piece ends up.
    pub fn landing(&self) -> Node {
        match *self {
            Move::Place { target, .. } | Move::PlaceTake { target, .. } => target,
            Move::Move { destination, .. } | Move::MoveTake { destination, .. } => destination,
        }
    }

    /// True for the capturing variants.
    pub fn is_take(&self) -> bool {
        matches!(self, Move::PlaceTake { .. } | Move::MoveTake { .. })
    }

    /// The same move with the capture half removed.
    pub fn without_capture(self) -> Self {
        match self {
            Move::PlaceTake { side, target, .. } => Move::place(side, target),
            Move::MoveTake {
                side,
                source,
                destination,
                ..
            } => Move::relocate(side, source, destination),
            plain => plain,
        }
    }

    /// The same move completed with a capture at `capture`.
    pub fn with_capture(self, capture: Node) -> Self {
        match self {
            Move::Place { side, target } | Move::PlaceTake { side, target, .. } => {
                Move::place_take(side, target, capture)
            }
            Move::Move {
                side,
                source,
                destination,
            }
            | Move::MoveTake {
                side,
                source,
                destination,
                ..
            } => Move::move_take(side, source, destination, capture),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Place { side, target } => write!(f, "{side}: place {target}"),
            Move::Move {
                side,
                source,
                destination,
            } => write!(f, "{side}: {source} -> {destination}"),
            Move::PlaceTake {
                side,
                target,
                capture,
            } => write!(f, "{side}: place {target} x {capture}"),
            Move::MoveTake {
                side,
                source,
                destination,
                capture,
            } => write!(f, "{side}: {source} -> {destination} x {capture}"),
        }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The node is already occupied.
    #[display("Node {} is already occupied", _0)]
    NodeOccupied(Node),

    /// The source node holds no piece.
    #[display("Node {} is empty", _0)]
    NodeEmpty(Node),

    /// The source piece belongs to the opponent.
    #[display("Node {} holds an opponent piece", _0)]
    NotYourPiece(Node),

    /// It's not this side's turn.
    #[display("It's not {}'s turn", _0)]
    WrongSide(Side),

    /// Source and destination are not connected and the side cannot fly.
    #[display("Node {} is not connected to node {}", _0, _1)]
    NotAdjacent(Node, Node),

    /// Placement attempted with an empty hand, or relocation while pieces remain in hand.
    #[display("{} cannot make that kind of move in the current phase", _0)]
    WrongPhase(Side),

    /// A capture was named but the move does not close a mill.
    #[display("Move does not close a mill")]
    NoMill,

    /// The move closes a mill but names no capture.
    #[display("Move closes a mill and must name a capture")]
    CaptureRequired,

    /// The capture target is not a legal capture.
    #[display("Node {} cannot be captured", _0)]
    IllegalCapture(Node),

    /// A capture was requested while none is owed.
    #[display("No capture is pending")]
    NoPendingCapture,

    /// A new move was submitted before the owed capture was made.
    #[display("A capture must be made first")]
    CapturePending,

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}
