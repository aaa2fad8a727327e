use crate::logic::board::{Board, Piece, PieceType, Position};
use crate::logic::generator::is_ranged_offset;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a single move changed the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Normal,
    Capture,
    RangedKill,
    RangedParalyze,
    RangedNoEffect,
}

impl MoveOutcome {
    pub const fn is_ranged(self) -> bool {
        matches!(
            self,
            Self::RangedKill | Self::RangedParalyze | Self::RangedNoEffect
        )
    }

    pub const fn is_capture(self) -> bool {
        matches!(self, Self::Capture | Self::RangedKill)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: MoveOutcome,
    /// The piece that stood on the destination before the move.
    pub target: Option<Piece>,
    pub king_captured: bool,
}

/// An Archer shooting at an occupied square on one of its firing offsets.
pub fn is_ranged_attack(board: &Board, from: Position, to: Position) -> bool {
    board
        .get_piece(from)
        .is_some_and(|p| p.piece_type == PieceType::Archer)
        && board.get_piece(to).is_some()
        && is_ranged_offset(from, to)
}

/// Applies an already generated move to `board`. A ranged shot at a Knight
/// flips a fair coin from `rng`: heads paralyzes it, tails does nothing.
pub fn resolve<R: Rng + ?Sized>(
    board: &mut Board,
    from: Position,
    to: Position,
    rng: &mut R,
) -> Resolution {
    apply(board, from, to, || rng.gen_bool(0.5))
}

/// Same as [`resolve`] with the coin always landing tails, so the board
/// never depends on chance. Used for look-ahead.
pub fn apply_deterministic(board: &mut Board, from: Position, to: Position) -> Resolution {
    apply(board, from, to, || false)
}

fn apply(
    board: &mut Board,
    from: Position,
    to: Position,
    flip: impl FnOnce() -> bool,
) -> Resolution {
    let target = board.get_piece(to);
    let king_captured = target.is_some_and(|p| p.piece_type == PieceType::King);

    if !is_ranged_attack(board, from, to) {
        board.move_piece(from, to);
        let outcome = if target.is_some() {
            MoveOutcome::Capture
        } else {
            MoveOutcome::Normal
        };
        return Resolution {
            outcome,
            target,
            king_captured,
        };
    }

    // The Archer never leaves its square when shooting
    let outcome = if target.is_some_and(|p| p.piece_type == PieceType::Knight) {
        if flip() {
            board.disable_knight(to);
            MoveOutcome::RangedParalyze
        } else {
            MoveOutcome::RangedNoEffect
        }
    } else {
        board.remove_piece(to);
        MoveOutcome::RangedKill
    };

    Resolution {
        outcome,
        target,
        king_captured,
    }
}
