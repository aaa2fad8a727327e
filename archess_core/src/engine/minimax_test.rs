use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchLimit, Searcher};
use crate::logic::board::{Board, Color, PieceType, Position};
use crate::logic::game::GameState;
use std::sync::Arc;

fn m(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

#[test]
fn test_depth_one_takes_hanging_queen() {
    let mut board = Board::empty();
    board.add_piece(m(0, 4), PieceType::King, Color::Black);
    board.add_piece(m(0, 0), PieceType::Rook, Color::Black);
    board.add_piece(m(3, 0), PieceType::Queen, Color::White);
    board.add_piece(m(7, 4), PieceType::King, Color::White);
    let game = GameState::from_board(board, Color::Black).unwrap();

    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
    let (mv, stats) = engine
        .search(&game, SearchLimit::DepthAndTime(1, 5_000))
        .unwrap();

    assert_eq!(mv, Move::new(m(0, 0), m(3, 0)));
    assert_eq!(stats.depth, 1);
}

#[test]
fn test_deeper_search_keeps_the_capture() {
    let mut board = Board::empty();
    board.add_piece(m(0, 4), PieceType::King, Color::Black);
    board.add_piece(m(0, 0), PieceType::Rook, Color::Black);
    board.add_piece(m(3, 0), PieceType::Queen, Color::White);
    board.add_piece(m(7, 4), PieceType::King, Color::White);
    let game = GameState::from_board(board, Color::Black).unwrap();

    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
    let (mv, stats) = engine.search(&game, SearchLimit::Depth(3)).unwrap();

    assert_eq!(mv, Move::new(m(0, 0), m(3, 0)));
    assert_eq!(stats.depth, 3);
}

#[test]
fn test_search_is_deterministic() {
    let mut game = GameState::new();
    game.turn = Color::Black;

    let config = Arc::new(EngineConfig::default());
    let first = AlphaBetaEngine::new(config.clone()).search(&game, SearchLimit::Depth(2));
    let second = AlphaBetaEngine::new(config).search(&game, SearchLimit::Depth(2));

    assert_eq!(first.map(|(mv, _)| mv), second.map(|(mv, _)| mv));
}
