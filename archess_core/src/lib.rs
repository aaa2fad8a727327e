pub mod controller;
pub mod engine;
pub mod logic;
pub mod worker;
