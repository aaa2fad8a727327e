pub mod board;
pub mod combat;
pub mod eval_constants;
pub mod game;
pub mod generator;
pub mod notation;
pub mod rules;

#[cfg(test)]
mod scenario_test;
