//! # sq-slot — Round-resolution engine for Squid Story
//!
//! Deterministic resolution of reel-based rounds plus the bankroll state
//! machine that drives a play session.
//!
//! ## Features
//!
//! - **Symbol Catalog**: symbols, payout tables and the reel sampling pool
//! - **Reel Generator**: fresh strips and uniform stop offsets every spin
//! - **Win Mechanisms**: free-form runs (rows, columns, diagonals) or fixed paylines
//! - **Round Resolver**: pure `matrix + bet → winning lines + payout`
//! - **Session**: bet tiers, bet floor, game over, timed transitions, events
//! - **Simulation**: seeded RTP and hit-rate measurement
//!
//! ## Architecture
//!
//! ```text
//! GameConfig ──validate──▶ Arc<SlotRules>
//!                              │
//!     ├── SymbolCatalog (symbols, payouts, reel pool)
//!     ├── ReelGenerator (strips, stop offsets)
//!     └── RoundResolver (FreeForm | Paylines)
//!           │
//!           v
//!     SlotSession → RoundView + Vec<SessionEvent>
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod paylines;
pub mod reels;
pub mod resolver;
pub mod session;
pub mod simulation;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use error::*;
pub use events::*;
pub use paylines::*;
pub use reels::*;
pub use resolver::*;
pub use session::*;
pub use simulation::*;
pub use symbols::*;
pub use timing::*;
