//! Board graph: node connections and mill lines.

use super::super::{Node, Position, Side};

/// Neighbours of each node, indexed by node.
const ADJACENCY: [&[u8]; 24] = [
    &[1, 9],
    &[0, 2, 4],
    &[1, 14],
    &[4, 10],
    &[1, 3, 5, 7],
    &[4, 13],
    &[7, 11],
    &[4, 6, 8],
    &[7, 12],
    &[0, 10, 21],
    &[3, 9, 11, 18],
    &[6, 10, 15],
    &[8, 13, 17],
    &[5, 12, 14, 20],
    &[2, 13, 23],
    &[11, 16],
    &[15, 17, 19],
    &[12, 16],
    &[10, 19],
    &[16, 18, 20, 22],
    &[13, 19],
    &[9, 22],
    &[19, 21, 23],
    &[14, 22],
];

/// The sixteen mill lines.
pub const MILLS: [[u8; 3]; 16] = [
    // Horizontal
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    // Vertical
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Nodes connected to `node`.
pub fn neighbors(node: Node) -> impl Iterator<Item = Node> {
    ADJACENCY[node.index()]
        .iter()
        .filter_map(|index| Node::new(*index as usize))
}

/// True if `a` and `b` share a connection.
pub fn are_adjacent(a: Node, b: Node) -> bool {
    ADJACENCY[a.index()].contains(&(b.index() as u8))
}

/// True if the piece of `side` on `node` is part of a complete mill.
pub fn in_mill(position: &Position, node: Node, side: Side) -> bool {
    MILLS
        .iter()
        .filter(|line| line.contains(&(node.index() as u8)))
        .any(|line| {
            line.iter().all(|index| {
                Node::new(*index as usize).and_then(|n| position.owner(n)) == Some(side)
            })
        })
}

/// Empty nodes next to the pieces of `side`, counted once per piece.
pub fn freedom(position: &Position, side: Side) -> u32 {
    position
        .nodes_of(side)
        .map(|node| neighbors(node).filter(|n| position.is_empty(*n)).count() as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::morris::Cell;

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    #[test]
    fn adjacency_is_symmetric() {
        for a in Node::all() {
            for b in neighbors(a) {
                assert!(are_adjacent(b, a), "{a} -> {b} has no way back");
            }
        }
    }

    #[test]
    fn every_node_lies_on_two_mills() {
        for node in Node::all() {
            let count = MILLS
                .iter()
                .filter(|line| line.contains(&(node.index() as u8)))
                .count();
            assert_eq!(count, 2, "node {node}");
        }
    }

    #[test]
    fn detects_vertical_mill() {
        let mut cells = [Cell::Empty; 24];
        for index in [1, 4, 7] {
            cells[index] = Cell::Occupied(Side::Black);
        }
        let position = Position::from_cells(cells, Side::White);
        assert!(in_mill(&position, n(4), Side::Black));
        assert!(!in_mill(&position, n(4), Side::White));
        assert!(!in_mill(&position, n(0), Side::Black));
    }

    #[test]
    fn freedom_counts_empty_neighbours() {
        let mut cells = [Cell::Empty; 24];
        cells[4] = Cell::Occupied(Side::White);
        cells[1] = Cell::Occupied(Side::Black);
        let position = Position::from_cells(cells, Side::White);
        assert_eq!(freedom(&position, Side::White), 3);
        assert_eq!(freedom(&position, Side::Black), 2);
    }
}
