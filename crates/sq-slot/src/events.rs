//! Session events consumed by renderers, audio and persistence

use serde::{Deserialize, Serialize};

use crate::resolver::RoundOutcome;

/// Something that happened during a session
///
/// Events are queued in order and handed out by `SlotSession::drain_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Bet deducted, new reels generated, all reels spinning
    SpinStarted {
        bet: u64,
        /// Balance after the deduction
        credits: u64,
    },
    /// A reel came to rest
    ReelStopped {
        reel_index: u8,
        /// Visible symbol ids, top to bottom
        symbols: Vec<String>,
    },
    /// All reels stopped and the round was paid
    RoundResolved { outcome: RoundOutcome, credits: u64 },
    /// The round paid nothing
    NoWin,
    /// Result display finished, session idle again
    WinPresentationEnded,
    /// Credits reached a higher tier threshold
    BetFloorRaised { tier_index: usize, bet: u64 },
    /// Player moved the bet within the allowed tiers
    BetChanged { tier_index: usize, bet: u64 },
    /// Balance fell below the lowest bet
    GameOver { credits: u64 },
    /// Stake restored after game over
    SessionReset { credits: u64 },
}

impl SessionEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpinStarted { .. } => "spin_started",
            Self::ReelStopped { .. } => "reel_stopped",
            Self::RoundResolved { .. } => "round_resolved",
            Self::NoWin => "no_win",
            Self::WinPresentationEnded => "win_presentation_ended",
            Self::BetFloorRaised { .. } => "bet_floor_raised",
            Self::BetChanged { .. } => "bet_changed",
            Self::GameOver { .. } => "game_over",
            Self::SessionReset { .. } => "session_reset",
        }
    }

    /// Is this a win celebration trigger?
    pub fn is_win(&self) -> bool {
        matches!(self, Self::RoundResolved { outcome, .. } if outcome.is_win())
    }
}
