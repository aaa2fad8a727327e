use crate::engine::Move;
use crate::logic::board::{BitboardIterator, Bitboard, Board, Color, Piece, PieceType, Position};

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ADJACENT: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const KNIGHT_JUMPS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
// Vertical 1-2 both ways plus the four diagonal neighbours
const ARCHER_SHOTS: [(isize, isize); 8] = [
    (-1, 0),
    (-2, 0),
    (1, 0),
    (2, 0),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Every square the piece on `from` can reach, movement and ranged attack
/// combined. Empty for an empty square or a paralyzed Knight.
pub fn generate_moves(board: &Board, from: Position) -> Bitboard {
    let Some(piece) = board.get_piece(from) else {
        return 0;
    };

    match piece.piece_type {
        PieceType::Pawn => pawn_moves(board, from, piece.color),
        PieceType::Rook => sliding_moves(board, from, piece.color, &ORTHOGONAL),
        PieceType::Bishop => sliding_moves(board, from, piece.color, &DIAGONAL),
        PieceType::Queen => {
            sliding_moves(board, from, piece.color, &ORTHOGONAL)
                | sliding_moves(board, from, piece.color, &DIAGONAL)
        }
        PieceType::Knight => {
            if board.is_disabled(from) {
                0
            } else {
                step_moves(board, from, piece.color, &KNIGHT_JUMPS)
            }
        }
        PieceType::King => step_moves(board, from, piece.color, &ADJACENT),
        PieceType::Archer => movement_targets(board, from) | ranged_targets(board, from),
    }
}

fn pawn_moves(board: &Board, from: Position, color: Color) -> Bitboard {
    let mut targets = 0;
    let dir = color.forward();

    if let Some(one) = from.offset(dir, 0) {
        if board.get_piece(one).is_none() {
            targets |= one.bit();
            if from.row == color.pawn_start_row() {
                if let Some(two) = from.offset(2 * dir, 0) {
                    if board.get_piece(two).is_none() {
                        targets |= two.bit();
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(diag) = from.offset(dir, dc) {
            if is_enemy(board.get_piece(diag), color) {
                targets |= diag.bit();
            }
        }
    }
    targets
}

fn sliding_moves(
    board: &Board,
    from: Position,
    color: Color,
    rays: &[(isize, isize)],
) -> Bitboard {
    let mut targets = 0;
    for &(dr, dc) in rays {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.get_piece(next) {
                None => targets |= next.bit(),
                Some(p) => {
                    if p.color != color {
                        targets |= next.bit();
                    }
                    break;
                }
            }
            current = next;
        }
    }
    targets
}

fn step_moves(board: &Board, from: Position, color: Color, offsets: &[(isize, isize)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|to| board.get_piece(*to).map_or(true, |p| p.color != color))
        .fold(0, |bb, to| bb | to.bit())
}

fn is_enemy(piece: Option<Piece>, color: Color) -> bool {
    piece.is_some_and(|p| p.color != color)
}

/// Archer movement: one step in any direction, onto empty squares only.
pub fn movement_targets(board: &Board, from: Position) -> Bitboard {
    ADJACENT
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|to| board.get_piece(*to).is_none())
        .fold(0, |bb, to| bb | to.bit())
}

/// Archer fire: enemy pieces on a shooting offset that are not immune.
/// Intervening pieces do not block the shot.
pub fn ranged_targets(board: &Board, from: Position) -> Bitboard {
    let Some(archer) = board.get_piece(from) else {
        return 0;
    };
    if archer.piece_type != PieceType::Archer {
        return 0;
    }

    ARCHER_SHOTS
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|to| match board.get_piece(*to) {
            Some(p) => p.color != archer.color && p.piece_type.is_ranged_target(),
            None => false,
        })
        .fold(0, |bb, to| bb | to.bit())
}

pub fn is_ranged_offset(from: Position, to: Position) -> bool {
    ARCHER_SHOTS
        .iter()
        .any(|&(dr, dc)| from.offset(dr, dc) == Some(to))
}

pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Pseudo-legal moves of one side, source squares in row-major order and
    /// destinations in row-major order within each source.
    pub fn generate_moves(&self, board: &Board, turn: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (from, _) in board.pieces(turn) {
            for to in BitboardIterator::new(generate_moves(board, from)) {
                moves.push(Move::new(from, to));
            }
        }
        moves
    }
}
