//! Monte Carlo RTP simulation
//!
//! Runs rounds of pure reel generation and resolution at a fixed bet, with
//! no bankroll and no timers. Used to tune the house edge through the reel
//! pool composition.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SlotRules;
use crate::error::SlotResult;
use crate::session::SessionStats;

/// Aggregated simulation results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Bet used for every round
    pub bet: u64,
    /// Totals, same shape as a live session
    pub stats: SessionStats,
    /// Winning lines per symbol id
    pub symbol_wins: BTreeMap<String, u64>,
    /// Credits paid per symbol id
    pub symbol_payout: BTreeMap<String, u64>,
    /// Winning lines per run length
    pub run_lengths: BTreeMap<u8, u64>,
}

impl SimulationReport {
    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        self.stats.rtp()
    }

    /// Winning rounds, percent
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Share of the total paid out by each symbol
    pub fn payout_share(&self, symbol_id: &str) -> f64 {
        let paid = self.symbol_payout.get(symbol_id).copied().unwrap_or(0);
        if self.stats.total_win == 0 {
            0.0
        } else {
            paid as f64 / self.stats.total_win as f64
        }
    }
}

/// Seeded round runner
pub struct Simulator {
    rules: Arc<SlotRules>,
    rng: ChaCha8Rng,
}

impl Simulator {
    pub fn new(rules: Arc<SlotRules>, seed: u64) -> Self {
        Self {
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Run `spins` rounds at `bet` (defaults to the base bet when 0)
    pub fn run(&mut self, spins: u64, bet: u64) -> SlotResult<SimulationReport> {
        let bet = if bet == 0 { self.rules.bets().base_bet() } else { bet };
        let generator = self.rules.reel_generator();
        let rows = self.rules.grid().rows as usize;
        let resolver = self.rules.resolver();

        let mut report = SimulationReport {
            bet,
            ..Default::default()
        };

        for _ in 0..spins {
            let reel_set = generator.spin(&mut self.rng, self.rules.catalog())?;
            let outcome = resolver.resolve(&reel_set.matrix(rows)?, bet);

            for line in &outcome.winning_lines {
                *report.symbol_wins.entry(line.symbol_id.clone()).or_default() += 1;
                *report.symbol_payout.entry(line.symbol_id.clone()).or_default() += line.payout;
                *report.run_lengths.entry(line.run_length).or_default() += 1;
            }
            report.stats.record(&outcome);
        }

        log::info!(
            "Simulated {} spins at bet {}: RTP {:.2}%, hit rate {:.2}%",
            spins,
            bet,
            report.rtp(),
            report.hit_rate()
        );
        Ok(report)
    }
}
