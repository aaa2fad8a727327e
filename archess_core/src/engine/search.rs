use crate::engine::config::EngineConfig;
use crate::engine::eval::SimpleEvaluator;
use crate::engine::{Evaluator, Move, SearchLimit, SearchStats, Searcher};
use crate::logic::board::{Board, Color};
use crate::logic::combat::apply_deterministic;
use crate::logic::game::GameState;
use crate::logic::rules::legal_moves;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Full-width minimax with alpha-beta pruning. Black maximizes, White
/// minimizes. Every node works on its own board copy.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: SimpleEvaluator,
    nodes_searched: u32,
    start_time: f64,
    time_limit: Option<f64>,
    stop: Arc<AtomicBool>,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: SimpleEvaluator::new(config.clone()),
            config,
            nodes_searched: 0,
            start_time: 0.0,
            time_limit: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = SimpleEvaluator::new(config.clone());
        self.config = config;
    }

    /// Flag that aborts the running search when set. A stop raised before
    /// `search` is called aborts that search; the flag is cleared once it
    /// returns.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map(|p| p.now()).unwrap_or(0.0);
            }
            0.0
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let start = SystemTime::now();
            let since_the_epoch = start.duration_since(UNIX_EPOCH).unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
                1000.0,
                f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
            );
            time_ms
        }
    }

    fn elapsed(&self) -> f64 {
        Self::now() - self.start_time
    }

    fn out_of_time(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self.time_limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    #[allow(clippy::manual_is_multiple_of)]
    fn check_time(&self) -> bool {
        let interval = self.config.time_check_interval.max(1);
        self.nodes_searched % interval == 0 && self.out_of_time()
    }

    /// Score of `board` with `turn` to move, or `None` once time runs out.
    fn alpha_beta(
        &mut self,
        board: &Board,
        mut alpha: i32,
        mut beta: i32,
        depth: u8,
        turn: Color,
    ) -> Option<i32> {
        self.nodes_searched = self.nodes_searched.wrapping_add(1);
        if self.check_time() {
            return None;
        }

        // A captured king ends the line
        if board.king_position(Color::Black).is_none() {
            return Some(-self.config.no_move_score);
        }
        if board.king_position(Color::White).is_none() {
            return Some(self.config.no_move_score);
        }

        if depth == 0 {
            return Some(self.evaluator.evaluate(board, turn));
        }

        let moves = legal_moves(board, turn);
        if moves.is_empty() {
            return Some(self.evaluator.evaluate(board, turn));
        }

        let maximizing = turn == Color::Black;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let mut next = *board;
            apply_deterministic(&mut next, mv.from, mv.to);
            let score = self.alpha_beta(&next, alpha, beta, depth - 1, turn.opposite())?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                break;
            }
        }
        Some(best)
    }

    /// One full-depth pass over the root moves. Ties keep the first move found.
    fn search_root(&mut self, board: &Board, turn: Color, depth: u8) -> Option<(Move, i32)> {
        let maximizing = turn == Color::Black;
        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;
        let mut best: Option<(Move, i32)> = None;

        for mv in legal_moves(board, turn) {
            let mut next = *board;
            apply_deterministic(&mut next, mv.from, mv.to);
            let score = self.alpha_beta(&next, alpha, beta, depth - 1, turn.opposite())?;

            let improves = best.map_or(true, |(_, b)| {
                if maximizing {
                    score > b
                } else {
                    score < b
                }
            });
            if improves {
                best = Some((mv, score));
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }
        best
    }
}

impl Searcher for AlphaBetaEngine {
    /// Iterative deepening from depth 1. A depth interrupted by the clock is
    /// discarded; `None` if no depth completed or there is no legal move.
    fn search(
        &mut self,
        game_state: &GameState,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        self.nodes_searched = 0;
        self.start_time = Self::now();

        #[allow(clippy::cast_precision_loss)]
        let time_limit = limit.time_ms().map(|t| t as f64);
        self.time_limit = time_limit;
        let max_depth = limit.max_depth();

        let board = game_state.board;
        let turn = game_state.turn;

        let mut best_move = None;
        let mut final_depth = 0;

        for d in 1..=max_depth {
            if self.out_of_time() {
                break;
            }

            match self.search_root(&board, turn, d) {
                Some((mv, score)) => {
                    log::debug!(
                        "depth {d}: best {mv} score {score} nodes {} ({:.0} ms)",
                        self.nodes_searched,
                        self.elapsed()
                    );
                    best_move = Some(mv);
                    final_depth = d;
                }
                None => break,
            }
        }

        self.stop.store(false, Ordering::Relaxed);
        let elapsed = self.elapsed();
        best_move.map(|mv| {
            (
                mv,
                SearchStats {
                    depth: final_depth,
                    nodes: self.nodes_searched,
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    time_ms: elapsed as u64,
                },
            )
        })
    }
}
