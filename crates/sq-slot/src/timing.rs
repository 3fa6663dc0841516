//! Timing profiles for deferred session transitions

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing, reels stopped by the player
    Normal,
    /// Fast mode with automatic reel stops
    Turbo,
    /// Everything resolves immediately (simulation, tests)
    Instant,
    /// Scaled or hand-edited values
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Detailed timing configuration (all durations in ms)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Stop reels on a timer instead of waiting for the player
    pub auto_stop: bool,

    /// Time before the first reel stops
    pub reel_spin_duration_ms: f64,

    /// Delay between consecutive reel stops
    pub reel_stop_interval_ms: f64,

    /// How long a win stays on screen before the next spin is allowed
    pub win_display_ms: f64,

    /// Hold after a losing round (0 = straight back to idle)
    pub no_win_display_ms: f64,

    /// Delay before an out-of-credits session resets
    pub game_over_reset_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            auto_stop: false,
            reel_spin_duration_ms: 1000.0,
            reel_stop_interval_ms: 200.0,
            win_display_ms: 3000.0,
            no_win_display_ms: 0.0,
            game_over_reset_ms: 3000.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            auto_stop: true,
            reel_spin_duration_ms: 400.0,
            reel_stop_interval_ms: 100.0,
            win_display_ms: 1200.0,
            no_win_display_ms: 0.0,
            game_over_reset_ms: 1500.0,
        }
    }

    /// No waiting at all
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            auto_stop: true,
            reel_spin_duration_ms: 0.0,
            reel_stop_interval_ms: 0.0,
            win_display_ms: 0.0,
            no_win_display_ms: 0.0,
            game_over_reset_ms: 0.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            auto_stop: self.auto_stop,
            reel_spin_duration_ms: self.reel_spin_duration_ms * factor,
            reel_stop_interval_ms: self.reel_stop_interval_ms * factor,
            win_display_ms: self.win_display_ms * factor,
            no_win_display_ms: self.no_win_display_ms * factor,
            game_over_reset_ms: self.game_over_reset_ms * factor,
        }
    }

    /// Time since spin start at which `reel_index` stops automatically
    pub fn reel_stop_due_ms(&self, reel_index: usize) -> f64 {
        self.reel_spin_duration_ms + reel_index as f64 * self.reel_stop_interval_ms
    }

    /// Calculate total spin duration (all reels stopping)
    pub fn total_spin_duration(&self, reel_count: u8) -> f64 {
        self.reel_stop_due_ms((reel_count as usize).saturating_sub(1))
    }

    /// Result hold for a resolved round
    pub fn result_display_ms(&self, is_win: bool) -> f64 {
        if is_win {
            self.win_display_ms
        } else {
            self.no_win_display_ms
        }
    }

    /// Reject negative or non-finite durations
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("reel_spin_duration_ms", self.reel_spin_duration_ms),
            ("reel_stop_interval_ms", self.reel_stop_interval_ms),
            ("win_display_ms", self.win_display_ms),
            ("no_win_display_ms", self.no_win_display_ms),
            ("game_over_reset_ms", self.game_over_reset_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTiming(format!("{name} = {value}")));
            }
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let instant = TimingConfig::instant();

        assert!(turbo.reel_spin_duration_ms < normal.reel_spin_duration_ms);
        assert!(turbo.win_display_ms < normal.win_display_ms);
        assert_eq!(instant.total_spin_duration(5), 0.0);

        // Losing rounds return to idle immediately by default
        assert_eq!(normal.result_display_ms(false), 0.0);
        assert_eq!(normal.result_display_ms(true), 3000.0);
    }

    #[test]
    fn test_reel_stop_schedule() {
        let normal = TimingConfig::normal();
        assert_eq!(normal.reel_stop_due_ms(0), 1000.0);
        assert_eq!(normal.reel_stop_due_ms(4), 1800.0);
        assert_eq!(normal.total_spin_duration(5), 1800.0);
    }

    #[test]
    fn test_scaled_and_validate() {
        let half = TimingConfig::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.win_display_ms, 1500.0);
        assert!(half.validate().is_ok());

        let broken = TimingConfig {
            win_display_ms: -1.0,
            ..TimingConfig::normal()
        };
        assert!(broken.validate().is_err());
    }
}
