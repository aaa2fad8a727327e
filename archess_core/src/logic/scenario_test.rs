use crate::logic::board::{Board, Color, PieceType, Position};
use crate::logic::combat::MoveOutcome;
use crate::logic::game::{GameState, GameStatus};
use crate::logic::rules::{is_checkmate, is_in_check};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn m(row: usize, col: usize) -> Position {
    Position::new(row, col).unwrap()
}

#[test]
fn test_king_pawn_opening() {
    let mut game = GameState::new();
    let mut rng = StdRng::seed_from_u64(1);

    assert!(game.make_move(m(6, 4), m(4, 4), &mut rng).is_ok());

    let pawn = game.board.get_piece(m(4, 4)).unwrap();
    assert_eq!(pawn.piece_type, PieceType::Pawn);
    assert_eq!(pawn.color, Color::White);
    assert!(game.board.get_piece(m(6, 4)).is_none());
    assert_eq!(game.status_message(), "Black's Turn");
    assert!(!is_in_check(&game.board, Color::Black));
}

#[test]
fn test_archer_shoots_knight() {
    let mut board = Board::empty();
    board.add_piece(m(4, 4), PieceType::Archer, Color::White);
    board.add_piece(m(2, 4), PieceType::Knight, Color::Black);
    board.add_piece(m(7, 4), PieceType::King, Color::White);
    board.add_piece(m(0, 0), PieceType::King, Color::Black);

    for seed in 0..32 {
        let mut game = GameState::from_board(board, Color::White).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let record = game.make_move(m(4, 4), m(2, 4), &mut rng).unwrap();

        match record.outcome {
            MoveOutcome::RangedParalyze => assert!(game.board.is_disabled(m(2, 4))),
            MoveOutcome::RangedNoEffect => assert_eq!(game.board.disabled_knights(), 0),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(
            game.board.get_piece(m(2, 4)).map(|p| p.piece_type),
            Some(PieceType::Knight)
        );
        assert_eq!(
            game.board.get_piece(m(4, 4)).map(|p| p.piece_type),
            Some(PieceType::Archer)
        );
    }
}

#[test]
fn test_rook_delivers_back_rank_mate() {
    let (board, turn) = Board::from_fen("3rkr2/3p1p2/8/8/8/R7/8/K7 w").unwrap();
    let mut game = GameState::from_board(board, turn).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    assert!(game.make_move(m(5, 0), m(5, 4), &mut rng).is_ok());

    assert!(is_in_check(&game.board, Color::Black));
    assert!(is_checkmate(&game.board, Color::Black));
    assert_eq!(game.status, GameStatus::Checkmate(Color::White));
    assert_eq!(game.status_message(), "Checkmate! White wins!");
}

#[test]
fn test_fresh_knight_on_vacated_paralysis_square() {
    let mut board = Board::empty();
    board.add_piece(m(7, 7), PieceType::King, Color::White);
    board.add_piece(m(4, 4), PieceType::Archer, Color::White);
    board.add_piece(m(2, 7), PieceType::Rook, Color::White);
    board.add_piece(m(0, 0), PieceType::King, Color::Black);
    board.add_piece(m(2, 4), PieceType::Knight, Color::Black);
    board.add_piece(m(0, 5), PieceType::Knight, Color::Black);
    let mut game = GameState::from_board(board, Color::White).unwrap();
    let mut heads = StepRng::new(0, 0);

    let shot = game.make_move(m(4, 4), m(2, 4), &mut heads).unwrap();
    assert_eq!(shot.outcome, MoveOutcome::RangedParalyze);
    game.make_move(m(0, 0), m(0, 1), &mut heads).unwrap();
    game.make_move(m(2, 7), m(2, 4), &mut heads).unwrap();
    game.make_move(m(0, 1), m(0, 0), &mut heads).unwrap();
    game.make_move(m(2, 4), m(2, 7), &mut heads).unwrap();
    game.make_move(m(0, 5), m(2, 4), &mut heads).unwrap();
    game.make_move(m(2, 7), m(3, 7), &mut heads).unwrap();

    // The knight now on e6 was never shot
    assert!(!game.board.is_disabled(m(2, 4)));
    assert!(game.make_move(m(2, 4), m(4, 5), &mut heads).is_ok());
    assert_eq!(
        game.board.get_piece(m(4, 5)).map(|p| p.piece_type),
        Some(PieceType::Knight)
    );
}
