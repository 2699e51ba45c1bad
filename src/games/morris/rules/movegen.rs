//! Move validation, generation and application.

use super::super::{Cell, Move, MoveError, Node, Position, Side};
use super::graph::{are_adjacent, in_mill, neighbors};
use tracing::instrument;

/// True if `side` has exactly three pieces left and may move to any empty node.
pub fn can_fly(position: &Position, side: Side) -> bool {
    position.in_hand(side) == 0 && position.on_board(side) == 3
}

/// Opponent pieces `side` may remove after closing a mill.
///
/// Pieces standing in a mill are protected unless every opponent piece is
/// in one.
pub fn capture_candidates(position: &Position, side: Side) -> Vec<Node> {
    let opponent = side.opponent();
    let all: Vec<Node> = position.nodes_of(opponent).collect();
    let free: Vec<Node> = all
        .iter()
        .copied()
        .filter(|node| !in_mill(position, *node, opponent))
        .collect();

    if free.is_empty() { all } else { free }
}

/// Applies a move without checking it.
///
/// The caller guarantees legality, typically because the move came from
/// [`legal_moves`] or passed [`validate`].
pub fn play(position: &Position, mv: Move) -> Position {
    let side = mv.side();
    let mut next = *position;

    match mv {
        Move::Place { target, .. } | Move::PlaceTake { target, .. } => {
            next.set(target, Cell::Occupied(side));
            next.take_from_hand(side);
        }
        Move::Move {
            source,
            destination,
            ..
        }
        | Move::MoveTake {
            source,
            destination,
            ..
        } => {
            next.set(source, Cell::Empty);
            next.set(destination, Cell::Occupied(side));
        }
    }

    if let Some(capture) = mv.capture() {
        next.set(capture, Cell::Empty);
        next.set_plies_without_mill(0);
    } else if mv.source().is_some() {
        next.set_plies_without_mill(position.plies_without_mill().saturating_add(1));
    }

    next.set_to_move(side.opponent());
    next
}

/// Checks a move against the rules.
///
/// Returns `Ok(Some(candidates))` when the move closes a mill but names no
/// capture while captures are available, `Ok(None)` when the move is
/// complete as given.
#[instrument(skip(position), fields(side = %position.to_move()))]
pub fn validate(position: &Position, mv: &Move) -> Result<Option<Vec<Node>>, MoveError> {
    let side = mv.side();
    if side != position.to_move() {
        return Err(MoveError::WrongSide(side));
    }

    match mv.source() {
        None => {
            if position.in_hand(side) == 0 {
                return Err(MoveError::WrongPhase(side));
            }
        }
        Some(source) => {
            if position.in_hand(side) > 0 {
                return Err(MoveError::WrongPhase(side));
            }
            match position.owner(source) {
                None => return Err(MoveError::NodeEmpty(source)),
                Some(owner) if owner != side => return Err(MoveError::NotYourPiece(source)),
                Some(_) => {}
            }
        }
    }

    let landing = mv.landing();
    if !position.is_empty(landing) {
        return Err(MoveError::NodeOccupied(landing));
    }

    if let Some(source) = mv.source()
        && !can_fly(position, side)
        && !are_adjacent(source, landing)
    {
        return Err(MoveError::NotAdjacent(source, landing));
    }

    let landed = play(position, mv.without_capture());
    let closes_mill = in_mill(&landed, landing, side);
    let candidates = if closes_mill {
        capture_candidates(&landed, side)
    } else {
        Vec::new()
    };

    match mv.capture() {
        Some(_) if !closes_mill => Err(MoveError::NoMill),
        Some(capture) if !candidates.contains(&capture) => Err(MoveError::IllegalCapture(capture)),
        Some(_) => Ok(None),
        None if candidates.is_empty() => Ok(None),
        None => Ok(Some(candidates)),
    }
}

/// Checks a move that must be complete as given.
///
/// Same as [`validate`] but a mill without a named capture is an error.
pub fn validate_complete(position: &Position, mv: &Move) -> Result<(), MoveError> {
    match validate(position, mv)? {
        None => Ok(()),
        Some(_) => Err(MoveError::CaptureRequired),
    }
}

/// Every legal move for the side to move, in generation order.
///
/// Placements come in node order. Relocations are ordered by source, then
/// destination. A move closing a mill expands into one capturing move per
/// candidate, in node order.
pub fn legal_moves(position: &Position) -> Vec<Move> {
    let side = position.to_move();
    let mut moves = Vec::new();

    for base in base_moves(position, side) {
        let landed = play(position, base);
        if in_mill(&landed, base.landing(), side) {
            let candidates = capture_candidates(&landed, side);
            if candidates.is_empty() {
                moves.push(base);
            } else {
                moves.extend(candidates.into_iter().map(|node| base.with_capture(node)));
            }
        } else {
            moves.push(base);
        }
    }

    moves
}

/// True if the side to move has at least one move.
pub fn has_any_move(position: &Position) -> bool {
    !base_moves(position, position.to_move()).is_empty()
}

fn base_moves(position: &Position, side: Side) -> Vec<Move> {
    if position.in_hand(side) > 0 {
        return position
            .empty_nodes()
            .map(|target| Move::place(side, target))
            .collect();
    }

    let flying = can_fly(position, side);
    let mut moves = Vec::new();
    for source in position.nodes_of(side) {
        if flying {
            moves.extend(
                position
                    .empty_nodes()
                    .map(|destination| Move::relocate(side, source, destination)),
            );
        } else {
            moves.extend(
                neighbors(source)
                    .filter(|destination| position.is_empty(*destination))
                    .map(|destination| Move::relocate(side, source, destination)),
            );
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    fn movement(white: &[usize], black: &[usize], to_move: Side) -> Position {
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
    fn opening_has_one_placement_per_node() {
        let moves = legal_moves(&Position::new());
        assert_eq!(moves.len(), 24);
        assert_eq!(moves[0], Move::place(Side::White, n(0)));
    }

    #[test]
    fn placement_decrements_hand_and_passes_turn() {
        let next = play(&Position::new(), Move::place(Side::White, n(4)));
        assert_eq!(next.owner(n(4)), Some(Side::White));
        assert_eq!(next.in_hand(Side::White), 8);
        assert_eq!(next.to_move(), Side::Black);
        assert_eq!(next.plies_without_mill(), 0);
    }

    #[test]
    fn closing_mill_expands_into_captures() {
        let position = movement(&[0, 1], &[5, 6, 7], Side::White)
            .with_in_hand(Side::White, 1)
            .with_in_hand(Side::Black, 1);
        let takes: Vec<Move> = legal_moves(&position)
            .into_iter()
            .filter(|mv| mv.target() == Some(n(2)))
            .collect();
        assert_eq!(
            takes,
            vec![
                Move::place_take(Side::White, n(2), n(5)),
                Move::place_take(Side::White, n(2), n(6)),
                Move::place_take(Side::White, n(2), n(7)),
            ]
        );
    }

    #[test]
    fn pieces_in_mills_are_protected() {
        let position = movement(&[0, 1, 2], &[3, 4, 5, 9], Side::White);
        assert_eq!(capture_candidates(&position, Side::White), vec![n(9)]);

        let all_in_mills = movement(&[0, 1, 2], &[3, 4, 5], Side::White);
        assert_eq!(
            capture_candidates(&all_in_mills, Side::White),
            vec![n(3), n(4), n(5)]
        );
    }

    #[test]
    fn relocation_must_follow_a_connection() {
        let position = movement(&[0, 10, 20, 22], &[3, 5, 7, 17], Side::White);
        assert_eq!(
            validate(&position, &Move::relocate(Side::White, n(0), n(2))),
            Err(MoveError::NotAdjacent(n(0), n(2)))
        );
        assert_eq!(validate(&position, &Move::relocate(Side::White, n(0), n(1))), Ok(None));
    }

    #[test]
    fn three_pieces_may_fly() {
        let position = movement(&[0, 10, 20], &[3, 5, 7, 17], Side::White);
        assert!(can_fly(&position, Side::White));
        assert_eq!(validate(&position, &Move::relocate(Side::White, n(0), n(23))), Ok(None));
    }

    #[test]
    fn validate_reports_owed_capture() {
        let position = movement(&[0, 1, 14, 22], &[3, 5, 7, 17], Side::White);
        let owed =
            validate(&position, &Move::relocate(Side::White, n(14), n(2))).expect("legal move");
        assert_eq!(owed, Some(vec![n(3), n(5), n(7), n(17)]));
        assert_eq!(
            validate_complete(&position, &Move::relocate(Side::White, n(14), n(2))),
            Err(MoveError::CaptureRequired)
        );
        assert_eq!(
            validate(&position, &Move::move_take(Side::White, n(22), n(23), n(3))),
            Err(MoveError::NoMill)
        );
    }

    #[test]
    fn wrong_phase_and_ownership_are_rejected() {
        let position = Position::new();
        assert_eq!(
            validate(&position, &Move::relocate(Side::White, n(0), n(1))),
            Err(MoveError::WrongPhase(Side::White))
        );
        assert_eq!(
            validate(&position, &Move::place(Side::Black, n(0))),
            Err(MoveError::WrongSide(Side::Black))
        );

        let moving = movement(&[0, 10, 20, 22], &[3, 5, 7, 17], Side::White);
        assert_eq!(
            validate(&moving, &Move::relocate(Side::White, n(3), n(4))),
            Err(MoveError::NotYourPiece(n(3)))
        );
        assert_eq!(
            validate(&moving, &Move::relocate(Side::White, n(1), n(2))),
            Err(MoveError::NodeEmpty(n(1)))
        );
    }

    #[test]
    fn movement_counts_plies_and_capture_resets() {
        let position =
            movement(&[0, 1, 14, 22], &[3, 5, 7, 17], Side::White).with_plies_without_mill(5);
        let quiet = play(&position, Move::relocate(Side::White, n(22), n(23)));
        assert_eq!(quiet.plies_without_mill(), 6);
        let take = play(&position, Move::move_take(Side::White, n(14), n(2), n(3)));
        assert_eq!(take.plies_without_mill(), 0);
        assert_eq!(take.owner(n(3)), None);
    }
}
