use crate::logic::board::{Color, Position, BOARD_SIZE};
use crate::logic::combat::MoveOutcome;
use crate::logic::game::MoveRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

impl fmt::Display for MoveRecord {
    /// `Pw e2-e4`, `Ab e7xe5 (ranged kill)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let sep = if self.outcome.is_capture() { 'x' } else { '-' };
        write!(
            f,
            "{}{} {}{}{}",
            self.piece.piece_type.letter(),
            color,
            self.from,
            sep,
            self.to
        )?;

        let note = match self.outcome {
            _ if self.king_captured() => Some("king destroyed"),
            MoveOutcome::RangedKill => Some("ranged kill"),
            MoveOutcome::RangedParalyze => Some("knight paralyzed"),
            MoveOutcome::RangedNoEffect => Some("knight undamaged"),
            MoveOutcome::Normal | MoveOutcome::Capture => None,
        };
        if let Some(note) = note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Move log as plain text, one record per line.
pub fn export_history(history: &[MoveRecord]) -> String {
    history
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Move = 0,
    RangedAttack = 1,
}

/// Number of distinct encoded actions: 64 sources × 64 targets × 2 kinds.
pub const ACTION_SPACE: usize = BOARD_SIZE * BOARD_SIZE * BOARD_SIZE * BOARD_SIZE * 2;

/// Flat integer id of a move, stable across sessions.
pub const fn encode_action(from: Position, to: Position, kind: ActionKind) -> usize {
    (from.row * 512 + from.col * 64 + to.row * 8 + to.col) * 2 + kind as usize
}

pub fn decode_action(action: usize) -> Option<(Position, Position, ActionKind)> {
    if action >= ACTION_SPACE {
        return None;
    }
    let kind = if action % 2 == 0 {
        ActionKind::Move
    } else {
        ActionKind::RangedAttack
    };
    let idx = action / 2;
    let from = Position::new(idx / 512, (idx / 64) % 8)?;
    let to = Position::new((idx / 8) % 8, idx % 8)?;
    Some((from, to, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{Piece, PieceType};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn record(piece_type: PieceType, color: Color, outcome: MoveOutcome) -> MoveRecord {
        MoveRecord {
            color,
            piece: Piece::new(piece_type, color),
            from: pos(6, 4),
            to: pos(4, 4),
            outcome,
            target: None,
            note: None,
        }
    }

    #[test]
    fn test_quiet_and_capture_notation() {
        let quiet = record(PieceType::Pawn, Color::White, MoveOutcome::Normal);
        assert_eq!(quiet.to_string(), "Pw e2-e4");

        let mut capture = record(PieceType::Rook, Color::Black, MoveOutcome::Capture);
        capture.target = Some(Piece::new(PieceType::Pawn, Color::White));
        assert_eq!(capture.to_string(), "Rb e2xe4");
    }

    #[test]
    fn test_ranged_notes() {
        let mut kill = record(PieceType::Archer, Color::White, MoveOutcome::RangedKill);
        kill.target = Some(Piece::new(PieceType::Bishop, Color::Black));
        assert_eq!(kill.to_string(), "Aw e2xe4 (ranged kill)");

        kill.target = Some(Piece::new(PieceType::King, Color::Black));
        assert_eq!(kill.to_string(), "Aw e2xe4 (king destroyed)");

        let para = record(PieceType::Archer, Color::White, MoveOutcome::RangedParalyze);
        assert_eq!(para.to_string(), "Aw e2-e4 (knight paralyzed)");
        let miss = record(PieceType::Archer, Color::White, MoveOutcome::RangedNoEffect);
        assert_eq!(miss.to_string(), "Aw e2-e4 (knight undamaged)");
    }

    #[test]
    fn test_export_joins_lines() {
        let a = record(PieceType::Pawn, Color::White, MoveOutcome::Normal);
        let mut b = record(PieceType::Pawn, Color::Black, MoveOutcome::Normal);
        b.from = pos(1, 4);
        b.to = pos(3, 4);
        assert_eq!(export_history(&[a, b]), "Pw e2-e4\nPb e7-e5");
        assert_eq!(export_history(&[]), "");
    }

    #[test]
    fn test_action_codec() {
        assert_eq!(ACTION_SPACE, 8192);
        let id = encode_action(pos(4, 4), pos(2, 4), ActionKind::RangedAttack);
        assert_eq!(id, (4 * 512 + 4 * 64 + 2 * 8 + 4) * 2 + 1);
        assert_eq!(
            decode_action(id),
            Some((pos(4, 4), pos(2, 4), ActionKind::RangedAttack))
        );
        assert_eq!(encode_action(pos(7, 7), pos(7, 7), ActionKind::RangedAttack), 8191);
        assert!(decode_action(8192).is_none());
    }
}
