//! Single owner of a running game. Front ends call in with moves and
//! commands and drain the resulting notifications.

use crate::engine::config::EngineConfig;
use crate::engine::opponent::{choose_move, OpponentKind, StrategyError};
use crate::engine::search::AlphaBetaEngine;
use crate::logic::board::{Board, BoardError, Color, PieceType, Position};
use crate::logic::combat::MoveOutcome;
use crate::logic::game::{GameState, GameStatus, MoveRecord};
use crate::logic::notation::export_history;
use crate::logic::rules::{is_in_check, MoveError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEvent {
    KingDestroyed,
    ArcherRangedKill,
    KnightParalyzed,
    KnightUndamaged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Full snapshot; paralyzed Knights are flagged on the board itself.
    BoardChanged(Board),
    StatusChanged { status: GameStatus, message: String },
    MoveLogged(MoveRecord),
    Special { kind: SpecialEvent, details: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] MoveError),
    #[error("{} has no legal moves", .0.name())]
    NoLegalMoves(Color),
    #[error("invalid board: {0}")]
    InvalidBoardState(#[from] BoardError),
    #[error("invalid opponent settings: {0}")]
    InvalidStrategy(#[from] StrategyError),
    #[error("it is not the computer's turn")]
    NotComputerTurn,
}

pub struct GameController<R: Rng = StdRng> {
    state: GameState,
    rng: R,
    opponent: OpponentKind,
    computer_color: Option<Color>,
    engine: AlphaBetaEngine,
    config: Arc<EngineConfig>,
    // Set while a loaded board fails validation; play is blocked until fixed
    board_error: Option<BoardError>,
    events: VecDeque<GameEvent>,
}

impl GameController<StdRng> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameController<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let config = Arc::new(config);
        Self {
            state: GameState::new(),
            rng,
            opponent: OpponentKind::default(),
            computer_color: Some(Color::Black),
            engine: AlphaBetaEngine::new(config.clone()),
            config,
            board_error: None,
            events: VecDeque::new(),
        }
    }

    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub const fn opponent(&self) -> OpponentKind {
        self.opponent
    }

    pub const fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    /// `None` for two human players.
    pub fn set_computer_color(&mut self, color: Option<Color>) {
        self.computer_color = color;
    }

    pub fn set_opponent_strategy(&mut self, kind: OpponentKind) -> Result<(), GameError> {
        self.opponent = kind.validate()?;
        log::info!("opponent set to {}", self.opponent);
        Ok(())
    }

    /// Whether the side to move belongs to the computer and the game is live.
    pub fn computer_to_move(&self) -> bool {
        self.board_error.is_none()
            && !self.state.status.is_terminal()
            && self.computer_color == Some(self.state.turn)
    }

    /// Plays a move for the side to move. Rejections leave the game as it was.
    pub fn attempt_move(&mut self, from: Position, to: Position) -> Result<MoveRecord, GameError> {
        if let Some(err) = self.board_error {
            return Err(GameError::InvalidBoardState(err));
        }
        match self.state.make_move(from, to, &mut self.rng) {
            Ok(record) => {
                self.publish_move(&record);
                Ok(record)
            }
            Err(err) => {
                log::warn!("rejected {from}-{to}: {err}");
                Err(err.into())
            }
        }
    }

    /// Raw-coordinate entry point for front ends that work in rows and columns.
    pub fn attempt_move_at(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Result<MoveRecord, GameError> {
        let from = Position::new(from.0, from.1).ok_or(MoveError::OutOfBounds)?;
        let to = Position::new(to.0, to.1).ok_or(MoveError::OutOfBounds)?;
        self.attempt_move(from, to)
    }

    /// Lets the configured opponent pick and play a move for the side to move.
    pub fn request_computer_move(&mut self) -> Result<MoveRecord, GameError> {
        if !self.computer_to_move() {
            return Err(GameError::NotComputerTurn);
        }
        let turn = self.state.turn;
        let (mv, stats) = choose_move(
            self.opponent,
            &self.state,
            &mut self.engine,
            &self.config,
            &mut self.rng,
        )
        .ok_or(GameError::NoLegalMoves(turn))?;

        let mut record = self.state.make_move(mv.from, mv.to, &mut self.rng)?;
        if let Some(stats) = stats {
            let note = stats.to_string();
            self.state.annotate_last(note.clone());
            record.note = Some(note);
        }
        self.publish_move(&record);
        Ok(record)
    }

    pub fn reset_game(&mut self) {
        self.state.reset();
        self.board_error = None;
        log::info!("new game");
        self.publish_position();
    }

    /// Takes a position from the board editor. An invalid board is kept for
    /// further editing, but play stays blocked until a valid one is loaded.
    pub fn load_board(&mut self, board: Board, turn: Color) -> Result<(), GameError> {
        match GameState::from_board(board, turn) {
            Ok(state) => {
                self.state = state;
                self.board_error = None;
                self.publish_position();
                Ok(())
            }
            Err(err) => {
                self.state.board = board;
                self.state.board.find_king_positions();
                self.state.turn = turn;
                self.state.history.clear();
                self.state.last_move = None;
                self.board_error = Some(err);
                self.events.push_back(GameEvent::BoardChanged(self.state.board));
                Err(err.into())
            }
        }
    }

    pub fn export_moves(&self) -> String {
        export_history(&self.state.history)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn publish_position(&mut self) {
        self.events.push_back(GameEvent::BoardChanged(self.state.board));
        self.events.push_back(GameEvent::StatusChanged {
            status: self.state.status,
            message: self.state.status_message(),
        });
    }

    fn publish_move(&mut self, record: &MoveRecord) {
        if let Some(kind) = special_kind(record) {
            self.events.push_back(GameEvent::Special {
                kind,
                details: special_details(kind, record),
            });
        }
        self.events.push_back(GameEvent::MoveLogged(record.clone()));
        self.publish_position();

        if self.state.status.is_terminal() {
            log::info!("{}", self.state.status_message());
        } else if is_in_check(&self.state.board, self.state.turn) {
            log::debug!("{} is in check", self.state.turn.name());
        }
    }
}

fn special_kind(record: &MoveRecord) -> Option<SpecialEvent> {
    if record.king_captured() {
        return Some(SpecialEvent::KingDestroyed);
    }
    match record.outcome {
        MoveOutcome::RangedKill => Some(SpecialEvent::ArcherRangedKill),
        MoveOutcome::RangedParalyze => Some(SpecialEvent::KnightParalyzed),
        MoveOutcome::RangedNoEffect => Some(SpecialEvent::KnightUndamaged),
        MoveOutcome::Normal | MoveOutcome::Capture => None,
    }
}

fn special_details(kind: SpecialEvent, record: &MoveRecord) -> String {
    let target = record
        .target
        .map_or(PieceType::Pawn.name(), |p| p.piece_type.name());
    match kind {
        SpecialEvent::KingDestroyed => format!(
            "{} wins! The {} King was destroyed!",
            record.color.name(),
            record.color.opposite().name()
        ),
        SpecialEvent::ArcherRangedKill => {
            format!("The Archer on {} shot down the {target} on {}.", record.from, record.to)
        }
        SpecialEvent::KnightParalyzed => {
            format!("The Knight on {} is paralyzed for the rest of the game.", record.to)
        }
        SpecialEvent::KnightUndamaged => {
            format!("The arrow missed; the Knight on {} is unharmed.", record.to)
        }
    }
}
