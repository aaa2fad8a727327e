use crate::logic::board::PieceType;
use crate::logic::eval_constants::{
    CENTER_BONUS, KING_CHECK_PENALTY, KING_EXPOSURE_PENALTY, KING_HOME_RANKS, MOBILITY_WEIGHT,
    NEAR_CENTER_BONUS, NO_MOVE_SCORE, VAL_ARCHER, VAL_BISHOP, VAL_KING, VAL_KNIGHT, VAL_PAWN,
    VAL_QUEEN, VAL_ROOK,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_archer: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,

    pub center_bonus: i32,
    pub near_center_bonus: i32,
    pub king_exposure_penalty: i32,
    pub king_check_penalty: i32,
    pub king_home_ranks: usize,
    pub mobility_weight: i32,
    pub no_move_score: i32,

    // Runtime Parameters
    pub time_check_interval: u32, // Nodes between clock reads
    pub reply_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_archer: VAL_ARCHER,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,

            center_bonus: CENTER_BONUS,
            near_center_bonus: NEAR_CENTER_BONUS,
            king_exposure_penalty: KING_EXPOSURE_PENALTY,
            king_check_penalty: KING_CHECK_PENALTY,
            king_home_ranks: KING_HOME_RANKS,
            mobility_weight: MOBILITY_WEIGHT,
            no_move_score: NO_MOVE_SCORE,

            time_check_interval: 1024,
            reply_delay_ms: 500,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_archer: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,

    center_bonus: Option<f32>,
    near_center_bonus: Option<f32>,
    king_exposure_penalty: Option<f32>,
    king_check_penalty: Option<f32>,
    king_home_ranks: Option<usize>,
    mobility_weight: Option<f32>,
    no_move_score: Option<f32>,

    time_check_interval: Option<u32>,
    reply_delay_ms: Option<u64>,
}

impl EngineConfig {
    /// Reads a tuning file in which numeric weights are multipliers of the
    /// built-in defaults rather than absolute values.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_archer: apply_scale(default.val_archer, json_config.val_archer),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),

            center_bonus: apply_scale(default.center_bonus, json_config.center_bonus),
            near_center_bonus: apply_scale(
                default.near_center_bonus,
                json_config.near_center_bonus,
            ),
            king_exposure_penalty: apply_scale(
                default.king_exposure_penalty,
                json_config.king_exposure_penalty,
            ),
            king_check_penalty: apply_scale(
                default.king_check_penalty,
                json_config.king_check_penalty,
            ),
            king_home_ranks: json_config
                .king_home_ranks
                .unwrap_or(default.king_home_ranks),
            mobility_weight: apply_scale(default.mobility_weight, json_config.mobility_weight),
            no_move_score: apply_scale(default.no_move_score, json_config.no_move_score),

            time_check_interval: json_config
                .time_check_interval
                .unwrap_or(default.time_check_interval),
            reply_delay_ms: json_config.reply_delay_ms.unwrap_or(default.reply_delay_ms),
        })
    }

    pub const fn piece_value(&self, piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::Pawn => self.val_pawn,
            PieceType::Archer => self.val_archer,
            PieceType::Knight => self.val_knight,
            PieceType::Bishop => self.val_bishop,
            PieceType::Rook => self.val_rook,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
