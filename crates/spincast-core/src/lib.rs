// Library root: the spin engine and its collaborators, with no terminal
// dependencies so both the TUI and tests can drive it directly.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod planner;
pub mod pool;
pub mod preset;
pub mod selector;
pub mod speech;
