//! Core domain types for Nine Men's Morris.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of nodes on the board graph.
pub const NODE_COUNT: usize = 24;

/// Pieces each side starts with in hand.
pub const PIECES_PER_SIDE: u8 = 9;

/// One of the two players.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// White (moves first).
    White,
    /// Black (moves second).
    Black,
}

impl Side {
    /// Returns the opponent side.
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Stable index used for per-side arrays (White = 0, Black = 1).
    pub fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }
}

/// A node index on the board, always in `[0, 24)`.
///
/// The only way to obtain a `Node` is through [`Node::new`] or
/// [`Node::all`], so every move built from nodes is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Node(u8);

impl Node {
    /// Creates a node from an index, or `None` when out of range.
    pub fn new(index: usize) -> Option<Self> {
        (index < NODE_COUNT).then_some(Self(index as u8))
    }

    /// Returns the node index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates over all 24 nodes in index order.
    pub fn all() -> impl Iterator<Item = Node> {
        (0..NODE_COUNT as u8).map(Node)
    }
}

impl TryFrom<u8> for Node {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Node::new(value as usize).ok_or_else(|| format!("node index {value} out of range"))
    }
}

impl From<Node> for u8 {
    fn from(node: Node) -> Self {
        node.0
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cell {
    /// No piece on the node.
    #[default]
    Empty,
    /// Node holds a piece of the given side.
    Occupied(Side),
}

/// Immutable snapshot of a game: node occupancy plus the side to move.
///
/// Besides the 24 cells, a position remembers how many pieces each side
/// still holds in hand and how many plies were played in the movement
/// phase since the last capture. Both are needed to generate legal moves
/// and to detect the no-mill draw from the snapshot alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    cells: [Cell; NODE_COUNT],
    to_move: Side,
    in_hand: [u8; 2],
    plies_without_mill: u8,
}

impl Position {
    /// Starting position: empty board, nine pieces in each hand, White to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; NODE_COUNT],
            to_move: Side::White,
            in_hand: [PIECES_PER_SIDE; 2],
            plies_without_mill: 0,
        }
    }

    /// Builds a position from explicit cells with both hands empty.
    pub fn from_cells(cells: [Cell; NODE_COUNT], to_move: Side) -> Self {
        Self {
            cells,
            to_move,
            in_hand: [0; 2],
            plies_without_mill: 0,
        }
    }

    /// Returns a copy with `count` pieces left in `side`'s hand.
    pub fn with_in_hand(mut self, side: Side, count: u8) -> Self {
        self.in_hand[side.index()] = count;
        self
    }

    /// Returns a copy with the no-mill ply counter set.
    pub fn with_plies_without_mill(mut self, plies: u8) -> Self {
        self.plies_without_mill = plies;
        self
    }

    /// Returns the cell at `node`.
    pub fn cell(&self, node: Node) -> Cell {
        self.cells[node.index()]
    }

    /// Returns all cells in node order.
    pub fn cells(&self) -> &[Cell; NODE_COUNT] {
        &self.cells
    }

    /// Returns true if `node` is empty.
    pub fn is_empty(&self, node: Node) -> bool {
        self.cell(node) == Cell::Empty
    }

    /// Returns the owner of the piece on `node`, if any.
    pub fn owner(&self, node: Node) -> Option<Side> {
        match self.cell(node) {
            Cell::Occupied(side) => Some(side),
            Cell::Empty => None,
        }
    }

    /// Returns the side to move.
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Pieces `side` has not placed yet.
    pub fn in_hand(&self, side: Side) -> u8 {
        self.in_hand[side.index()]
    }

    /// Plies played in the movement phase since the last capture.
    pub fn plies_without_mill(&self) -> u8 {
        self.plies_without_mill
    }

    /// Pieces `side` has on the board.
    pub fn on_board(&self, side: Side) -> u8 {
        self.cells
            .iter()
            .filter(|cell| **cell == Cell::Occupied(side))
            .count() as u8
    }

    /// Pieces on the board plus pieces in hand.
    pub fn material(&self, side: Side) -> u8 {
        self.on_board(side) + self.in_hand(side)
    }

    /// True while either side still has pieces to place.
    pub fn is_placement_phase(&self) -> bool {
        self.in_hand.iter().any(|count| *count > 0)
    }

    /// Nodes holding a piece of `side`, in index order.
    pub fn nodes_of(&self, side: Side) -> impl Iterator<Item = Node> + '_ {
        Node::all().filter(move |node| self.owner(*node) == Some(side))
    }

    /// Empty nodes, in index order.
    pub fn empty_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        Node::all().filter(|node| self.is_empty(*node))
    }

    /// Compares occupancy, side to move and pieces in hand, ignoring the
    /// ply counter.
    ///
    /// Used for repetition detection, where the ply counter differs
    /// between otherwise identical positions.
    pub fn same_arrangement(&self, other: &Position) -> bool {
        self.cells == other.cells && self.to_move == other.to_move && self.in_hand == other.in_hand
    }

    pub(crate) fn set(&mut self, node: Node, cell: Cell) {
        self.cells[node.index()] = cell;
    }

    pub(crate) fn take_from_hand(&mut self, side: Side) {
        let slot = &mut self.in_hand[side.index()];
        *slot = slot.saturating_sub(1);
    }

    pub(crate) fn set_to_move(&mut self, side: Side) {
        self.to_move = side;
    }

    pub(crate) fn set_plies_without_mill(&mut self, plies: u8) {
        self.plies_without_mill = plies;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
