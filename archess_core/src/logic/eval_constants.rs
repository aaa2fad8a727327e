// Piece Values (hundredths of a pawn)
pub const VAL_PAWN: i32 = 100;
pub const VAL_ARCHER: i32 = 200;
pub const VAL_KNIGHT: i32 = 300;
pub const VAL_BISHOP: i32 = 300;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
pub const VAL_KING: i32 = 100_000;

pub const CENTER_BONUS: i32 = 50;
pub const NEAR_CENTER_BONUS: i32 = 20;

// Centre-control table, same for both colors.
// 2 = the four centre squares, 1 = the ring around them.
#[rustfmt::skip]
pub const CENTER_ZONE: [[u8; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 1, 2, 2, 1, 0, 0],
    [0, 0, 1, 2, 2, 1, 0, 0],
    [0, 0, 1, 1, 1, 1, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

pub const KING_EXPOSURE_PENALTY: i32 = 100;
pub const KING_CHECK_PENALTY: i32 = 5_000;
/// Ranks behind which a king counts as sheltered.
pub const KING_HOME_RANKS: usize = 2;

pub const MOBILITY_WEIGHT: i32 = 10;
pub const NO_MOVE_SCORE: i32 = 1_000_000;
