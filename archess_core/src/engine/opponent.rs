use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchLimit, SearchStats, Searcher};
use crate::logic::board::{Board, Color, PieceType, Position};
use crate::logic::game::GameState;
use crate::logic::rules::legal_moves;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which computer player replies to the human.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OpponentKind {
    #[default]
    Random,
    Greedy,
    Minimax { max_depth: u8, thinking_time_secs: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("max depth must be at least 1")]
    ZeroDepth,
    #[error("thinking time must be at least 1 second")]
    ZeroThinkingTime,
}

impl OpponentKind {
    /// Minimax needs a depth and a thinking time of at least one.
    pub const fn validate(self) -> Result<Self, StrategyError> {
        match self {
            Self::Minimax { max_depth: 0, .. } => Err(StrategyError::ZeroDepth),
            Self::Minimax {
                thinking_time_secs: 0,
                ..
            } => Err(StrategyError::ZeroThinkingTime),
            other => Ok(other),
        }
    }

    pub fn search_limit(self) -> Option<SearchLimit> {
        match self {
            Self::Minimax {
                max_depth,
                thinking_time_secs,
            } => Some(SearchLimit::DepthAndTime(
                max_depth,
                u64::from(thinking_time_secs) * 1000,
            )),
            Self::Random | Self::Greedy => None,
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Greedy => write!(f, "greedy"),
            Self::Minimax {
                max_depth,
                thinking_time_secs,
            } => write!(f, "minimax (depth {max_depth}, {thinking_time_secs}s)"),
        }
    }
}

/// Destination holds an enemy piece other than the King.
fn is_attacking(board: &Board, mv: &Move, color: Color) -> bool {
    board
        .get_piece(mv.to)
        .is_some_and(|p| p.color != color && p.piece_type != PieceType::King)
}

fn nearest_enemy_distance(board: &Board, from: Position, color: Color) -> Option<usize> {
    board
        .pieces(color.opposite())
        .map(|(pos, _)| from.manhattan(pos))
        .min()
}

/// Moves that bring the moving piece strictly closer to the nearest enemy.
fn approaching_moves(board: &Board, moves: &[Move], color: Color) -> Vec<Move> {
    moves
        .iter()
        .filter(|mv| {
            match (
                nearest_enemy_distance(board, mv.from, color),
                nearest_enemy_distance(board, mv.to, color),
            ) {
                (Some(before), Some(after)) => after < before,
                _ => false,
            }
        })
        .copied()
        .collect()
}

fn fallback_move<R: Rng + ?Sized>(
    board: &Board,
    moves: &[Move],
    color: Color,
    rng: &mut R,
) -> Option<Move> {
    let approaching = approaching_moves(board, moves, color);
    approaching
        .choose(rng)
        .or_else(|| moves.choose(rng))
        .copied()
}

/// Uniform pick among attacking moves, else among approaching moves, else any.
pub fn random_move<R: Rng + ?Sized>(board: &Board, color: Color, rng: &mut R) -> Option<Move> {
    let moves = legal_moves(board, color);
    let attacking: Vec<Move> = moves
        .iter()
        .filter(|mv| is_attacking(board, mv, color))
        .copied()
        .collect();

    if let Some(mv) = attacking.choose(rng) {
        return Some(*mv);
    }
    fallback_move(board, &moves, color, rng)
}

/// Takes the most valuable target; the first one found wins a tie.
pub fn greedy_move<R: Rng + ?Sized>(
    board: &Board,
    color: Color,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<Move> {
    let moves = legal_moves(board, color);
    let mut best: Option<(Move, i32)> = None;
    for mv in moves.iter().filter(|mv| is_attacking(board, mv, color)) {
        let value = board
            .get_piece(mv.to)
            .map_or(0, |p| config.piece_value(p.piece_type));
        if best.map_or(true, |(_, v)| value > v) {
            best = Some((*mv, value));
        }
    }

    if let Some((mv, _)) = best {
        return Some(mv);
    }
    fallback_move(board, &moves, color, rng)
}

/// Picks a move for the side to move with the given strategy. Minimax falls
/// back to a random move when no depth finished in time.
pub fn choose_move<R: Rng + ?Sized>(
    kind: OpponentKind,
    state: &GameState,
    engine: &mut AlphaBetaEngine,
    config: &EngineConfig,
    rng: &mut R,
) -> Option<(Move, Option<SearchStats>)> {
    match kind {
        OpponentKind::Random => random_move(&state.board, state.turn, rng).map(|mv| (mv, None)),
        OpponentKind::Greedy => {
            greedy_move(&state.board, state.turn, config, rng).map(|mv| (mv, None))
        }
        OpponentKind::Minimax { .. } => {
            let limit = kind.search_limit()?;
            if let Some((mv, stats)) = engine.search(state, limit) {
                return Some((mv, Some(stats)));
            }
            log::warn!("minimax finished no depth in time, playing a random move");
            random_move(&state.board, state.turn, rng).map(|mv| (mv, None))
        }
    }
}
