//! Depth-limited alpha-beta search.
//!
//! White maximises and Black minimises the same static evaluation:
//! ten points per piece of material plus one point per free neighbour of
//! each piece, White minus Black. Terminal positions score beyond any
//! static value so a forced win is always preferred.

use super::{SearchResult, Strategy};
use crate::games::morris::{Outcome, Position, Side, rules};
use tracing::{debug, instrument, warn};

const MATERIAL_WEIGHT: i32 = 10;
const FREEDOM_WEIGHT: i32 = 1;
const WIN_SCORE: i32 = 100_000;

/// Alpha-beta minimax to a fixed depth in plies.
#[derive(Debug, Clone, Copy)]
pub struct Minimax {
    depth: u8,
}

impl Minimax {
    /// Creates a search of `depth` plies. A depth of zero is treated as one.
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
        }
    }

    /// Search depth in plies.
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Static score of a position from White's point of view.
pub fn evaluate(position: &Position) -> i32 {
    let side_score = |side: Side| {
        i32::from(position.material(side)) * MATERIAL_WEIGHT
            + rules::freedom(position, side) as i32 * FREEDOM_WEIGHT
    };
    side_score(Side::White) - side_score(Side::Black)
}

fn terminal_score(outcome: Outcome, remaining: u8) -> i32 {
    // Prefer quicker wins and slower losses.
    let bonus = i32::from(remaining);
    match outcome {
        Outcome::Winner(Side::White) => WIN_SCORE + bonus,
        Outcome::Winner(Side::Black) => -WIN_SCORE - bonus,
        Outcome::Draw => 0,
    }
}

fn alpha_beta(position: &Position, depth: u8, mut alpha: i32, mut beta: i32) -> i32 {
    if let Some(end) = rules::ending(position) {
        return terminal_score(end.outcome, depth);
    }
    if depth == 0 {
        return evaluate(position);
    }

    let maximising = position.to_move() == Side::White;
    let mut best = if maximising { i32::MIN } else { i32::MAX };

    for mv in rules::legal_moves(position) {
        let score = alpha_beta(&rules::play(position, mv), depth - 1, alpha, beta);
        if maximising {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if beta <= alpha {
            break;
        }
    }

    best
}

impl Strategy for Minimax {
    #[instrument(skip(self, position), fields(depth = self.depth))]
    fn search(&self, position: Position, side: Side) -> SearchResult {
        let mut root = position;
        root.set_to_move(side);

        let maximising = side == Side::White;
        let mut best: Option<(i32, SearchResult)> = None;
        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;

        for mv in rules::legal_moves(&root) {
            let score = alpha_beta(&rules::play(&root, mv), self.depth - 1, alpha, beta);
            let better = match best {
                None => true,
                Some((current, _)) if maximising => score > current,
                Some((current, _)) => score < current,
            };
            if better {
                best = Some((score, SearchResult::from(mv)));
                if maximising {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
            }
        }

        match best {
            Some((score, result)) => {
                debug!(score, "Minimax decided");
                result
            }
            None => {
                warn!("No legal move to pick");
                SearchResult::default()
            }
        }
    }

    fn name(&self) -> &str {
        "minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::morris::{Cell, Move, Node};

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    fn setup(white: &[usize], black: &[usize], to_move: Side) -> Position {
        let mut cells = [Cell::Empty; 24];
        for index in white {
            cells[*index] = Cell::Occupied(Side::White);
        }
        for index in black {
            cells[*index] = Cell::Occupied(Side::Black);
        }
        Position::from_cells(cells, to_move)
    }

    #[test]
    fn evaluation_is_symmetric_at_start() {
        assert_eq!(evaluate(&Position::new()), 0);
    }

    #[test]
    fn takes_the_winning_capture() {
        // White closes 0-1-2 by moving 14 -> 2; Black is down to three.
        let position = setup(&[0, 1, 14, 22], &[3, 5, 7], Side::White);
        let result = Minimax::new(2).search(position, Side::White);
        let mv = result.to_move(Side::White).expect("coherent result");
        assert_eq!(mv.source(), Some(n(14)));
        assert_eq!(mv.destination(), Some(n(2)));
        assert!(mv.is_take());
    }

    #[test]
    fn black_minimises() {
        let position = setup(&[3, 5, 7], &[0, 1, 14, 22], Side::Black);
        let result = Minimax::new(1).search(position, Side::Black);
        assert_eq!(
            result.to_move(Side::Black).map(|mv| mv.without_capture()),
            Some(Move::relocate(Side::Black, n(14), n(2)))
        );
    }

    #[test]
    fn zero_depth_is_clamped() {
        assert_eq!(Minimax::new(0).depth(), 1);
    }
}
