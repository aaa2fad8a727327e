use crate::logic::board::{Board, Color, Position};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod opponent;
pub mod search;

#[cfg(test)]
mod minimax_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
    DepthAndTime(u8, u64),
}

impl SearchLimit {
    pub const fn max_depth(self) -> u8 {
        match self {
            Self::Depth(d) | Self::DepthAndTime(d, _) => d,
            Self::Time(_) => u8::MAX,
        }
    }

    pub const fn time_ms(self) -> Option<u64> {
        match self {
            Self::Depth(_) => None,
            Self::Time(ms) | Self::DepthAndTime(_, ms) => Some(ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {}, {} nodes, {} ms",
            self.depth, self.nodes, self.time_ms
        )
    }
}

pub trait Evaluator {
    /// Score of `board` from Black's point of view, `turn` to move.
    fn evaluate(&self, board: &Board, turn: Color) -> i32;
}

pub trait Searcher {
    fn search(&mut self, game_state: &GameState, limit: SearchLimit)
        -> Option<(Move, SearchStats)>;
}
