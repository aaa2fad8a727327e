use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Input {
    ComputeMove(GameState, SearchLimit, EngineConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    MoveFound(Move, SearchStats),
    /// No depth finished or the side to move has no legal move; the caller
    /// falls back to a random move.
    NoMove,
}

/// Runs the minimax search off the main thread. Each request carries its own
/// copy of the game.
#[derive(Default)]
pub struct SearchWorker {
    engine: Option<AlphaBetaEngine>,
}

impl SearchWorker {
    pub fn compute(&mut self, msg: Input) -> Output {
        match msg {
            Input::ComputeMove(game_state, limit, config) => {
                let config = Arc::new(config);
                if let Some(engine) = &mut self.engine {
                    engine.update_config(config.clone());
                }
                let engine = self
                    .engine
                    .get_or_insert_with(|| AlphaBetaEngine::new(config));

                engine
                    .search(&game_state, limit)
                    .map_or(Output::NoMove, |(mv, stats)| Output::MoveFound(mv, stats))
            }
        }
    }
}

impl Worker for SearchWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self::default()
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        let output = self.compute(msg);
        scope.respond(id, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{Board, Color, PieceType, Position};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_compute_finds_capture() {
        let mut board = Board::empty();
        board.add_piece(pos(0, 4), PieceType::King, Color::Black);
        board.add_piece(pos(0, 0), PieceType::Rook, Color::Black);
        board.add_piece(pos(3, 0), PieceType::Queen, Color::White);
        board.add_piece(pos(7, 4), PieceType::King, Color::White);
        let state = GameState::from_board(board, Color::Black).unwrap();

        let mut worker = SearchWorker::default();
        let output = worker.compute(Input::ComputeMove(
            state.clone(),
            SearchLimit::Depth(1),
            EngineConfig::default(),
        ));
        match output {
            Output::MoveFound(mv, stats) => {
                assert_eq!(mv, Move::new(pos(0, 0), pos(3, 0)));
                assert_eq!(stats.depth, 1);
            }
            Output::NoMove => panic!("expected a move"),
        }

        // The engine is reused for later requests
        let again = worker.compute(Input::ComputeMove(
            state,
            SearchLimit::Depth(1),
            EngineConfig::default(),
        ));
        assert!(matches!(again, Output::MoveFound(..)));
    }

    #[test]
    fn test_compute_reports_no_move() {
        let (board, turn) = Board::from_fen("k7/8/1Q6/8/8/8/8/7K b").unwrap();
        let state = GameState {
            board,
            turn,
            ..GameState::new()
        };
        let output = SearchWorker::default().compute(Input::ComputeMove(
            state,
            SearchLimit::Depth(2),
            EngineConfig::default(),
        ));
        assert_eq!(output, Output::NoMove);
    }

    #[test]
    fn test_input_survives_json() {
        let input = Input::ComputeMove(
            GameState::new(),
            SearchLimit::DepthAndTime(3, 1_000),
            EngineConfig::default(),
        );
        let json = serde_json::to_string(&input).unwrap();
        let Input::ComputeMove(state, limit, _) = serde_json::from_str(&json).unwrap();
        assert_eq!(state.board, Board::new());
        assert_eq!(limit, SearchLimit::DepthAndTime(3, 1_000));
    }

    #[test]
    fn test_paralysis_reaches_the_worker() {
        let mut board = Board::empty();
        board.add_piece(pos(0, 4), PieceType::King, Color::Black);
        board.add_piece(pos(2, 2), PieceType::Knight, Color::Black);
        board.add_piece(pos(4, 3), PieceType::Queen, Color::White);
        board.add_piece(pos(7, 7), PieceType::King, Color::White);
        board.disable_knight(pos(2, 2));
        let state = GameState::from_board(board, Color::Black).unwrap();

        let json = serde_json::to_string(&Input::ComputeMove(
            state,
            SearchLimit::Depth(1),
            EngineConfig::default(),
        ))
        .unwrap();
        let input: Input = serde_json::from_str(&json).unwrap();

        match SearchWorker::default().compute(input) {
            Output::MoveFound(mv, _) => assert_ne!(mv.from, pos(2, 2)),
            Output::NoMove => panic!("the king can still move"),
        }
    }
}
