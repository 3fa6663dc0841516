//! sq-state: Local player record and leaderboard storage
//!
//! Persists the high score and reached milestones between runs, and keeps
//! the ranked list of submitted scores.

mod error;
mod leaderboard;
mod record;

pub use error::*;
pub use leaderboard::*;
pub use record::*;
