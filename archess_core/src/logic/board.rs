use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use thiserror::Error;

pub type Bitboard = u64;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row delta of a forward step. White starts on rows 6-7 and moves up.
    pub const fn forward(self) -> isize {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub const fn pawn_start_row(self) -> usize {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
    Archer = 6,
}

impl PieceType {
    pub const ALL: [Self; 7] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
        Self::Archer,
    ];

    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Archer => 'A',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pawn => "Pawn",
            Self::Knight => "Knight",
            Self::Bishop => "Bishop",
            Self::Rook => "Rook",
            Self::Queen => "Queen",
            Self::King => "King",
            Self::Archer => "Archer",
        }
    }

    /// Rooks and Queens are immune to Archer fire.
    pub const fn is_ranged_target(self) -> bool {
        matches!(
            self,
            Self::Pawn | Self::Bishop | Self::King | Self::Knight | Self::Archer
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    /// FEN-style letter: uppercase for White, lowercase for Black.
    pub const fn to_char(self) -> char {
        let c = self.piece_type.letter();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let piece_type = PieceType::ALL
            .into_iter()
            .find(|pt| pt.letter() == c.to_ascii_uppercase())?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self::new(piece_type, color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn square(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    pub const fn from_square(sq: usize) -> Self {
        Self {
            row: (sq / BOARD_SIZE) % BOARD_SIZE,
            col: sq % BOARD_SIZE,
        }
    }

    pub const fn bit(self) -> Bitboard {
        1 << self.square()
    }

    #[must_use]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The square seen from the other side of the board.
    #[must_use]
    pub const fn rotated(self) -> Self {
        Self {
            row: BOARD_SIZE - 1 - self.row,
            col: BOARD_SIZE - 1 - self.col,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn file_char(self) -> char {
        (b'a' + self.col as u8) as char
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn rank_char(self) -> char {
        (b'0' + (BOARD_SIZE - self.row) as u8) as char
    }

    /// Parses algebraic squares such as `e2`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?.to_digit(10)? as usize;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Self::new(BOARD_SIZE - rank, file as usize - 'a' as usize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("expected 8 ranks, found {0}")]
    InvalidRankCount(usize),
    #[error("rank {0} does not describe exactly 8 squares")]
    InvalidRankLength(usize),
    #[error("unknown piece letter '{0}'")]
    InvalidPiece(char),
    #[error("unknown side to move")]
    InvalidTurn,
    #[error("{0:?} has no king on the board")]
    MissingKing(Color),
    #[error("{0:?} has more than one king on the board")]
    TooManyKings(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Row-major, index = row * 8 + col
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; 64],
    // Squares whose current Knight is paralyzed; a bit dies with its Knight
    disabled_knights: Bitboard,
    king_positions: [Option<Position>; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The Archess starting position: Archers replace the b- and g-pawns.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_pieces(Color::Black, 0, 1);
        board.setup_pieces(Color::White, 7, 6);
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; 64],
            disabled_knights: 0,
            king_positions: [None; 2],
        }
    }

    fn setup_pieces(&mut self, color: Color, back_row: usize, pawn_row: usize) {
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        let front = [
            PieceType::Pawn,
            PieceType::Archer,
            PieceType::Pawn,
            PieceType::Pawn,
            PieceType::Pawn,
            PieceType::Pawn,
            PieceType::Archer,
            PieceType::Pawn,
        ];

        for (col, (&b, &f)) in back.iter().zip(front.iter()).enumerate() {
            if let Some(pos) = Position::new(back_row, col) {
                self.add_piece(pos, b, color);
            }
            if let Some(pos) = Position::new(pawn_row, col) {
                self.add_piece(pos, f, color);
            }
        }
    }

    #[must_use]
    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.grid.get(pos.square()).copied().flatten()
    }

    pub fn add_piece(&mut self, pos: Position, piece_type: PieceType, color: Color) {
        self.set_piece(pos, Some(Piece::new(piece_type, color)));
    }

    /// Places or clears a square, keeping the king cache in step. Whatever
    /// stood there is gone, so is its paralysis.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        let previous = self.grid.get(pos.square()).copied().flatten();
        if let Some(old) = previous {
            self.forget_king(old, pos);
        }
        self.disabled_knights &= !pos.bit();
        if let Some(slot) = self.grid.get_mut(pos.square()) {
            *slot = piece;
        }
        if let Some(p) = piece {
            self.track_king(p, pos);
        }
    }

    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        let removed = self.get_piece(pos);
        self.set_piece(pos, None);
        removed
    }

    /// Moves whatever stands on `from` to `to` and returns the piece it displaced.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self.remove_piece(from)?;
        let captured = self.remove_piece(to);
        self.set_piece(to, Some(piece));
        captured
    }

    fn track_king(&mut self, piece: Piece, pos: Position) {
        if piece.piece_type == PieceType::King {
            if let Some(slot) = self.king_positions.get_mut(piece.color.index()) {
                *slot = Some(pos);
            }
        }
    }

    fn forget_king(&mut self, piece: Piece, pos: Position) {
        if piece.piece_type == PieceType::King {
            if let Some(slot) = self.king_positions.get_mut(piece.color.index()) {
                if *slot == Some(pos) {
                    *slot = None;
                }
            }
        }
    }

    #[must_use]
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.king_positions.get(color.index()).copied().flatten()
    }

    /// Rebuilds the king cache from the grid.
    pub fn find_king_positions(&mut self) {
        self.king_positions = [None; 2];
        for sq in 0..64 {
            let pos = Position::from_square(sq);
            if let Some(piece) = self.get_piece(pos) {
                self.track_king(piece, pos);
            }
        }
    }

    pub fn count_pieces(&self, piece: Piece) -> usize {
        self.grid.iter().filter(|p| **p == Some(piece)).count()
    }

    /// Checks the edit→play boundary: exactly one king per side.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in [Color::White, Color::Black] {
            match self.count_pieces(Piece::new(PieceType::King, color)) {
                0 => return Err(BoardError::MissingKing(color)),
                1 => {}
                _ => return Err(BoardError::TooManyKings(color)),
            }
        }
        Ok(())
    }

    pub const fn is_disabled(&self, pos: Position) -> bool {
        self.disabled_knights & pos.bit() != 0
    }

    pub fn disable_knight(&mut self, pos: Position) {
        self.disabled_knights |= pos.bit();
    }

    pub const fn disabled_knights(&self) -> Bitboard {
        self.disabled_knights
    }

    /// Pieces of one side in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.grid.iter().enumerate().filter_map(move |(sq, p)| match p {
            Some(piece) if piece.color == color => Some((Position::from_square(sq), *piece)),
            _ => None,
        })
    }

    /// The same position seen from the other side: rotated 180° with colors swapped.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let mut board = Self::empty();
        for sq in 0..64 {
            let pos = Position::from_square(sq);
            if let Some(p) = self.get_piece(pos) {
                board.add_piece(pos.rotated(), p.piece_type, p.color.opposite());
            }
            if self.is_disabled(pos) {
                board.disable_knight(pos.rotated());
            }
        }
        board
    }

    pub fn to_fen_string(&self, turn: Color) -> String {
        let mut fen = String::new();
        for row in 0..BOARD_SIZE {
            let mut empty_count = 0;
            for col in 0..BOARD_SIZE {
                let piece = Position::new(row, col).and_then(|pos| self.get_piece(pos));
                if let Some(piece) = piece {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_char());
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row + 1 < BOARD_SIZE {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if turn == Color::White { 'w' } else { 'b' });
        fen
    }

    /// Parses a placement string (ranks from row 0, i.e. rank 8) with an
    /// optional `w`/`b` side-to-move suffix; White moves when it is absent.
    pub fn from_fen(fen: &str) -> Result<(Self, Color), BoardError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().unwrap_or_default();
        let turn = match parts.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(BoardError::InvalidTurn),
        };

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_SIZE {
            return Err(BoardError::InvalidRankCount(ranks.len()));
        }

        let mut board = Self::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(BoardError::InvalidPiece(c))?;
                let pos = Position::new(row, col).ok_or(BoardError::InvalidRankLength(row))?;
                board.set_piece(pos, Some(piece));
                col += 1;
            }
            if col != BOARD_SIZE {
                return Err(BoardError::InvalidRankLength(row));
            }
        }
        Ok((board, turn))
    }

    /// Plain-text diagram with file/rank labels; paralyzed Knights are
    /// wrapped in parentheses.
    pub fn to_text(&self) -> String {
        let mut out = String::from("   a  b  c  d  e  f  g  h\n");
        for row in 0..BOARD_SIZE {
            out.push_str(&format!("{} ", BOARD_SIZE - row));
            for col in 0..BOARD_SIZE {
                let Some(pos) = Position::new(row, col) else {
                    continue;
                };
                match self.get_piece(pos) {
                    Some(p) if self.is_disabled(pos) && p.piece_type == PieceType::Knight => {
                        out.push('(');
                        out.push(p.to_char());
                        out.push(')');
                    }
                    Some(p) => {
                        out.push(' ');
                        out.push(p.to_char());
                        out.push(' ');
                    }
                    None => out.push_str(" · "),
                }
            }
            out.push_str(&format!(" {}\n", BOARD_SIZE - row));
        }
        out.push_str("   a  b  c  d  e  f  g  h\n");
        out
    }
}

pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    pub const fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            let lsb = self.bb.trailing_zeros() as usize;
            self.bb &= self.bb - 1;
            Some(Position::from_square(lsb))
        }
    }
}
