use crate::logic::board::{Board, BoardError, Color, Piece, PieceType, Position};
use crate::logic::combat::{resolve, MoveOutcome};
use crate::logic::rules::{has_legal_moves, is_in_check, validate_piece_logic, MoveError};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Check(Color),        // Side in check
    Checkmate(Color),    // Winner
    KingCaptured(Color), // Winner
    Stalemate,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Checkmate(_) | Self::KingCaptured(_) | Self::Stalemate
        )
    }

    /// Status line for the side to move.
    pub fn message(self, turn: Color) -> String {
        match self {
            Self::InProgress => format!("{}'s Turn", turn.name()),
            Self::Check(c) => format!("{}'s Turn - In Check!", c.name()),
            Self::Checkmate(w) => format!("Checkmate! {} wins!", w.name()),
            Self::KingCaptured(w) => format!(
                "{} wins! The {} King was destroyed!",
                w.name(),
                w.opposite().name()
            ),
            Self::Stalemate => "Stalemate! The game is drawn.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub color: Color,
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub outcome: MoveOutcome,
    pub target: Option<Piece>,
    pub note: Option<String>, // For AI stats or other info
}

impl MoveRecord {
    pub fn king_captured(&self) -> bool {
        self.target.is_some_and(|p| p.piece_type == PieceType::King)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub last_move: Option<(Position, Position)>,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            status: GameStatus::InProgress,
            last_move: None,
            history: Vec::new(),
        }
    }

    /// Starts play from an edited position. The board must hold exactly one
    /// king per side.
    pub fn from_board(board: Board, turn: Color) -> Result<Self, BoardError> {
        board.validate()?;
        let mut state = Self {
            board,
            turn,
            status: GameStatus::InProgress,
            last_move: None,
            history: Vec::new(),
        };
        state.board.find_king_positions();
        state.update_status();
        Ok(state)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Validates and plays `from -> to` for the side to move. A rejected move
    /// leaves the state untouched.
    pub fn make_move<R: Rng + ?Sized>(
        &mut self,
        from: Position,
        to: Position,
        rng: &mut R,
    ) -> Result<MoveRecord, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        validate_piece_logic(&self.board, from, to, self.turn)?;

        let mut next_board = self.board;
        let piece = next_board
            .get_piece(from)
            .ok_or(MoveError::NoPieceAtSource)?;
        let resolution = resolve(&mut next_board, from, to, rng);

        let record = MoveRecord {
            color: self.turn,
            piece,
            from,
            to,
            outcome: resolution.outcome,
            target: resolution.target,
            note: None,
        };

        if resolution.king_captured {
            // Game over; the turn stays with the winner
            self.board = next_board;
            self.history.push(record.clone());
            self.last_move = Some((from, to));
            self.status = GameStatus::KingCaptured(self.turn);
            return Ok(record);
        }

        if is_in_check(&next_board, self.turn) {
            return Err(MoveError::SelfCheck);
        }

        self.board = next_board;
        self.history.push(record.clone());
        self.turn = self.turn.opposite();
        self.last_move = Some((from, to));

        self.update_status();

        Ok(record)
    }

    fn update_status(&mut self) {
        let current_turn = self.turn;
        let in_check = is_in_check(&self.board, current_turn);
        let has_moves = has_legal_moves(&self.board, current_turn);

        self.status = match (in_check, has_moves) {
            (true, false) => GameStatus::Checkmate(current_turn.opposite()),
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check(current_turn),
            (false, true) => GameStatus::InProgress,
        };
    }

    pub fn status_message(&self) -> String {
        self.status.message(self.turn)
    }

    /// Attaches a free-form note (search statistics) to the latest record.
    pub fn annotate_last(&mut self, note: String) {
        if let Some(record) = self.history.last_mut() {
            record.note = Some(note);
        }
    }
}
