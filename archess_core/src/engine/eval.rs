use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color, PieceType, Position, BOARD_SIZE};
use crate::logic::eval_constants::CENTER_ZONE;
use crate::logic::rules::{count_legal_moves, is_in_check};
use std::sync::Arc;

pub struct SimpleEvaluator {
    config: Arc<EngineConfig>,
}

/// +1 for Black (the maximizing side), -1 for White.
const fn sign(color: Color) -> i32 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

impl SimpleEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    fn center_score(&self, pos: Position) -> i32 {
        let zone = CENTER_ZONE
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .unwrap_or(0);
        match zone {
            2 => self.config.center_bonus,
            1 => self.config.near_center_bonus,
            _ => 0,
        }
    }

    fn material_and_position(&self, board: &Board) -> i32 {
        let mut score = 0;
        for color in [Color::White, Color::Black] {
            for (pos, piece) in board.pieces(color) {
                let mut value = self.config.piece_value(piece.piece_type);
                if piece.piece_type != PieceType::King {
                    value += self.center_score(pos);
                }
                score += sign(color) * value;
            }
        }
        score
    }

    fn king_safety(&self, board: &Board) -> i32 {
        let home = self.config.king_home_ranks;
        let mut score = 0;
        for color in [Color::White, Color::Black] {
            let Some(king) = board.king_position(color) else {
                continue;
            };
            let exposed = match color {
                Color::White => king.row + home < BOARD_SIZE,
                Color::Black => king.row >= home,
            };
            if exposed {
                score -= sign(color) * self.config.king_exposure_penalty;
            }
            if is_in_check(board, color) {
                score -= sign(color) * self.config.king_check_penalty;
            }
        }
        score
    }
}

impl Evaluator for SimpleEvaluator {
    fn evaluate(&self, board: &Board, turn: Color) -> i32 {
        let white_moves = count_legal_moves(board, Color::White);
        let black_moves = count_legal_moves(board, Color::Black);

        let to_move = match turn {
            Color::White => white_moves,
            Color::Black => black_moves,
        };
        if to_move == 0 {
            return -sign(turn) * self.config.no_move_score;
        }

        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let mobility = (black_moves as i32 - white_moves as i32) * self.config.mobility_weight;

        self.material_and_position(board) + self.king_safety(board) + mobility
    }
}
