//! Session and bankroll state machine
//!
//! A session owns the credit balance, the bet tiers and the round lifecycle:
//!
//! ```text
//! Idle ──spin──▶ Spinning ──last reel stops──▶ Resolving ──display over──▶ Idle
//!                                                                         │
//!                                   credits < base bet ◀──────────────────┘
//!                                         │
//!                                      GameOver ──reset delay──▶ Idle
//! ```
//!
//! Timed transitions (automatic reel stops, end of result display, game-over
//! reset) are held as explicit state and driven by [`SlotSession::advance`].

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::{BetLadder, SlotRules};
use crate::events::SessionEvent;
use crate::reels::{Grid, Reel, ReelSet};
use crate::resolver::{RoundOutcome, WinningLine};

// ═══════════════════════════════════════════════════════════════════════════
// BANKROLL
// ═══════════════════════════════════════════════════════════════════════════

/// Direction of a bet change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetDirection {
    Up,
    Down,
}

/// Credits plus the selected and minimum bet tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankrollState {
    /// Current balance
    pub credits: u64,
    /// Selected bet tier
    pub current_tier: usize,
    /// Bet floor: highest tier ever unlocked this session
    pub highest_tier: usize,
}

impl BankrollState {
    /// Fresh bankroll with the floor already matched to `credits`
    pub fn new(credits: u64, ladder: &BetLadder) -> Self {
        let mut bankroll = Self {
            credits,
            current_tier: 0,
            highest_tier: 0,
        };
        bankroll.raise_floor(ladder);
        bankroll
    }

    /// Bet actually taken on the next spin
    pub fn effective_bet(&self, ladder: &BetLadder) -> u64 {
        ladder.tier_amount(self.current_tier).min(self.credits)
    }

    /// Raise the floor to the tier the balance has reached
    ///
    /// Returns the new floor when it moved. The floor never moves down.
    pub fn raise_floor(&mut self, ladder: &BetLadder) -> Option<usize> {
        let reached = ladder.tier_for_credits(self.credits);
        if reached <= self.highest_tier {
            return None;
        }
        self.highest_tier = reached;
        self.current_tier = reached;
        Some(reached)
    }

    /// Move the selected tier; both directions are bounded by the floor
    ///
    /// The selection can never sit above or below `highest_tier`, so this
    /// only moves a bankroll that was out of shape.
    pub fn change_bet(&mut self, direction: BetDirection) -> bool {
        let target = match direction {
            BetDirection::Up => (self.current_tier + 1).min(self.highest_tier),
            BetDirection::Down => self.current_tier.saturating_sub(1).max(self.highest_tier),
        };
        if target == self.current_tier {
            return false;
        }
        self.current_tier = target;
        true
    }

    /// Clamp tiers back into a valid shape (used when restoring saved state)
    fn normalize(&mut self, ladder: &BetLadder) {
        self.highest_tier = self.highest_tier.min(ladder.top_tier());
        self.current_tier = self.highest_tier;
        self.raise_floor(ladder);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STATISTICS
// ═══════════════════════════════════════════════════════════════════════════

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub losses: u64,
    pub biggest_win: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Fold a resolved round into the totals
    pub fn record(&mut self, outcome: &RoundOutcome) {
        self.total_spins += 1;
        self.total_bet += outcome.bet;
        self.total_win += outcome.total_payout;
        if outcome.is_win() {
            self.wins += 1;
            self.biggest_win = self.biggest_win.max(outcome.total_payout);
            self.max_win_ratio = self.max_win_ratio.max(outcome.win_ratio());
        } else {
            self.losses += 1;
        }
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════

/// Observable round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Idle,
    Spinning,
    Resolving,
    GameOver,
}

/// Phase plus the pending timer of its deferred transition
#[derive(Debug, Clone, Copy, PartialEq)]
enum PhaseState {
    Idle,
    Spinning {
        /// Reels already stopped (stops go left to right)
        stopped: usize,
        /// Time since the spin started
        elapsed_ms: f64,
    },
    Resolving {
        remaining_ms: f64,
    },
    GameOver {
        remaining_ms: f64,
    },
}

/// Next deferred action `advance` has to run
enum Step {
    Done,
    StopReel,
    EndPresentation,
    Reset,
}

/// Snapshot handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    pub credits: u64,
    /// Bet the next spin would take
    pub bet: u64,
    pub reels: Vec<Reel>,
    pub stop_offsets: Vec<usize>,
    /// Per reel: still spinning?
    pub spinning: Vec<bool>,
    /// Visible matrix, `matrix[reel][row]`
    pub matrix: Grid,
    /// Wins to highlight (only while the result is displayed)
    pub winning_lines: Vec<WinningLine>,
}

/// One player's game: bankroll, round lifecycle and pending timers
pub struct SlotSession {
    rules: Arc<SlotRules>,
    rng: ChaCha8Rng,
    bankroll: BankrollState,
    phase: PhaseState,
    reel_set: ReelSet,
    matrix: Grid,
    spinning: Vec<bool>,
    committed_bet: u64,
    last_outcome: Option<RoundOutcome>,
    stats: SessionStats,
    events: Vec<SessionEvent>,
}

impl SlotSession {
    /// Start a session at the configured stake, seeded from the OS
    pub fn new(rules: Arc<SlotRules>) -> Self {
        let bankroll = BankrollState::new(rules.config().initial_credits, rules.bets());
        Self::build(rules, bankroll, ChaCha8Rng::from_os_rng())
    }

    /// Start a reproducible session
    pub fn with_seed(rules: Arc<SlotRules>, seed: u64) -> Self {
        let bankroll = BankrollState::new(rules.config().initial_credits, rules.bets());
        Self::build(rules, bankroll, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Resume from a saved bankroll
    ///
    /// Enters game over straight away if the balance cannot cover the base bet.
    pub fn restore(rules: Arc<SlotRules>, mut bankroll: BankrollState) -> Self {
        bankroll.normalize(rules.bets());
        let mut session = Self::build(rules, bankroll, ChaCha8Rng::from_os_rng());
        session.check_game_over();
        session
    }

    fn build(rules: Arc<SlotRules>, bankroll: BankrollState, rng: ChaCha8Rng) -> Self {
        let reels = rules.grid().reels as usize;
        Self {
            rules,
            rng,
            bankroll,
            phase: PhaseState::Idle,
            reel_set: ReelSet::default(),
            matrix: Grid::new(),
            spinning: vec![false; reels],
            committed_bet: 0,
            last_outcome: None,
            stats: SessionStats::default(),
            events: Vec::new(),
        }
    }

    /// Reseed the RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMMANDS
    // ═══════════════════════════════════════════════════════════════════════

    /// Take the bet and start a round
    ///
    /// Refused (returns `false`, nothing changes) unless idle with a
    /// positive effective bet.
    pub fn spin(&mut self) -> bool {
        if self.phase != PhaseState::Idle {
            return false;
        }
        let bet = self.effective_bet();
        if bet == 0 {
            return false;
        }

        let rows = self.rules.grid().rows as usize;
        let reel_set = match self.rules.reel_generator().spin(&mut self.rng, self.rules.catalog()) {
            Ok(set) => set,
            Err(e) => {
                log::error!("Reel generation failed: {e}");
                return false;
            }
        };
        let matrix = match reel_set.matrix(rows) {
            Ok(matrix) => matrix,
            Err(e) => {
                log::error!("Matrix extraction failed: {e}");
                return false;
            }
        };

        self.bankroll.credits -= bet;
        self.committed_bet = bet;
        self.reel_set = reel_set;
        self.matrix = matrix;
        self.spinning = vec![true; self.reel_set.reels.len()];
        self.last_outcome = None;
        self.phase = PhaseState::Spinning {
            stopped: 0,
            elapsed_ms: 0.0,
        };

        log::debug!("Spin started: bet {bet}, credits {}", self.bankroll.credits);
        self.events.push(SessionEvent::SpinStarted {
            bet,
            credits: self.bankroll.credits,
        });
        true
    }

    /// Stop the leftmost spinning reel; the last stop resolves the round
    pub fn stop_next_reel(&mut self) -> bool {
        let reel_count = self.spinning.len();
        let reel_index = match &mut self.phase {
            PhaseState::Spinning { stopped, .. } if *stopped < reel_count => {
                let index = *stopped;
                *stopped += 1;
                index
            }
            _ => return false,
        };

        self.spinning[reel_index] = false;
        let symbols = self.matrix.get(reel_index).map_or_else(Vec::new, |column| {
            column
                .iter()
                .filter_map(|&index| self.rules.catalog().get(index))
                .map(|symbol| symbol.id.clone())
                .collect()
        });
        self.events.push(SessionEvent::ReelStopped {
            reel_index: reel_index as u8,
            symbols,
        });

        if reel_index + 1 == reel_count {
            self.resolve_round();
        }
        true
    }

    /// Stop every remaining reel at once
    pub fn stop_all_reels(&mut self) {
        while self.stop_next_reel() {}
    }

    /// Change the selected tier (idle only)
    pub fn change_bet(&mut self, direction: BetDirection) -> bool {
        if self.phase != PhaseState::Idle {
            return false;
        }
        if !self.bankroll.change_bet(direction) {
            return false;
        }
        let tier_index = self.bankroll.current_tier;
        let bet = self.rules.bets().tier_amount(tier_index);
        log::debug!("Bet changed to tier {tier_index} ({bet})");
        self.events.push(SessionEvent::BetChanged { tier_index, bet });
        true
    }

    /// Let `elapsed_ms` pass, firing any timed transitions that fall due
    ///
    /// Time left over after one transition carries into the next.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let mut budget = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
        loop {
            match self.next_step(&mut budget) {
                Step::Done => break,
                Step::StopReel => {
                    self.stop_next_reel();
                }
                Step::EndPresentation => self.finish_presentation(),
                Step::Reset => self.reset(),
            }
        }
    }

    fn next_step(&mut self, budget: &mut f64) -> Step {
        let timing = self.rules.timing();
        match &mut self.phase {
            PhaseState::Idle => Step::Done,
            PhaseState::Spinning {
                stopped,
                elapsed_ms,
            } => {
                if !timing.auto_stop {
                    *elapsed_ms += *budget;
                    *budget = 0.0;
                    return Step::Done;
                }
                let wait = (timing.reel_stop_due_ms(*stopped) - *elapsed_ms).max(0.0);
                if *budget >= wait {
                    *elapsed_ms += wait;
                    *budget -= wait;
                    Step::StopReel
                } else {
                    *elapsed_ms += *budget;
                    *budget = 0.0;
                    Step::Done
                }
            }
            PhaseState::Resolving { remaining_ms } => {
                if consume(remaining_ms, budget) {
                    Step::EndPresentation
                } else {
                    Step::Done
                }
            }
            PhaseState::GameOver { remaining_ms } => {
                if consume(remaining_ms, budget) {
                    Step::Reset
                } else {
                    Step::Done
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════

    fn resolve_round(&mut self) {
        let outcome = self.rules.resolver().resolve(&self.matrix, self.committed_bet);
        let is_win = outcome.is_win();

        self.bankroll.credits = self.bankroll.credits.saturating_add(outcome.total_payout);
        self.stats.record(&outcome);

        log::debug!(
            "Round resolved: bet {}, paid {}, credits {}",
            outcome.bet,
            outcome.total_payout,
            self.bankroll.credits
        );
        self.events.push(SessionEvent::RoundResolved {
            outcome: outcome.clone(),
            credits: self.bankroll.credits,
        });
        if !is_win {
            self.events.push(SessionEvent::NoWin);
        }

        if let Some(tier_index) = self.bankroll.raise_floor(self.rules.bets()) {
            let bet = self.rules.bets().tier_amount(tier_index);
            log::info!("Bet floor raised to tier {tier_index} ({bet})");
            self.events.push(SessionEvent::BetFloorRaised { tier_index, bet });
        }

        self.last_outcome = Some(outcome);
        let hold = self.rules.timing().result_display_ms(is_win);
        if hold > 0.0 {
            self.phase = PhaseState::Resolving { remaining_ms: hold };
        } else {
            self.finish_presentation();
        }
    }

    fn finish_presentation(&mut self) {
        self.phase = PhaseState::Idle;
        self.events.push(SessionEvent::WinPresentationEnded);
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        let base_bet = self.rules.bets().base_bet();
        if self.phase != PhaseState::Idle || self.bankroll.credits >= base_bet {
            return;
        }

        log::info!("Game over: {} credits left, base bet {}", self.bankroll.credits, base_bet);
        self.events.push(SessionEvent::GameOver {
            credits: self.bankroll.credits,
        });
        let delay = self.rules.timing().game_over_reset_ms;
        if delay > 0.0 {
            self.phase = PhaseState::GameOver { remaining_ms: delay };
        } else {
            self.reset();
        }
    }

    fn reset(&mut self) {
        let initial = self.rules.config().initial_credits;
        self.bankroll = BankrollState::new(initial, self.rules.bets());
        self.phase = PhaseState::Idle;
        self.last_outcome = None;
        self.spinning.iter_mut().for_each(|s| *s = false);
        self.deal_fresh_reels();

        log::info!("Session reset to {initial} credits");
        self.events.push(SessionEvent::SessionReset { credits: initial });
    }

    /// New strips shown from their top, so a new game starts on a clean grid
    fn deal_fresh_reels(&mut self) {
        let rows = self.rules.grid().rows as usize;
        let dealt = self
            .rules
            .reel_generator()
            .spin(&mut self.rng, self.rules.catalog())
            .and_then(|mut set| {
                set.stop_offsets.iter_mut().for_each(|offset| *offset = 0);
                let matrix = set.matrix(rows)?;
                Ok((set, matrix))
            });

        match dealt {
            Ok((set, matrix)) => {
                self.reel_set = set;
                self.matrix = matrix;
            }
            Err(e) => {
                log::error!("Could not deal reels after reset: {e}");
                self.reel_set = ReelSet::default();
                self.matrix = Grid::new();
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn rules(&self) -> &Arc<SlotRules> {
        &self.rules
    }

    pub fn credits(&self) -> u64 {
        self.bankroll.credits
    }

    pub fn bankroll(&self) -> BankrollState {
        self.bankroll
    }

    /// `min(tier amount, credits)`
    pub fn effective_bet(&self) -> u64 {
        self.bankroll.effective_bet(self.rules.bets())
    }

    pub fn phase(&self) -> RoundPhase {
        match self.phase {
            PhaseState::Idle => RoundPhase::Idle,
            PhaseState::Spinning { .. } => RoundPhase::Spinning,
            PhaseState::Resolving { .. } => RoundPhase::Resolving,
            PhaseState::GameOver { .. } => RoundPhase::GameOver,
        }
    }

    pub fn reel_set(&self) -> &ReelSet {
        &self.reel_set
    }

    pub fn spinning_flags(&self) -> &[bool] {
        &self.spinning
    }

    pub fn visible_matrix(&self) -> &Grid {
        &self.matrix
    }

    /// Wins to highlight; empty outside the result display
    pub fn winning_lines(&self) -> &[WinningLine] {
        match (&self.phase, &self.last_outcome) {
            (PhaseState::Resolving { .. }, Some(outcome)) => outcome.winning_lines.as_slice(),
            _ => &[],
        }
    }

    /// Most recent resolved round
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Renderer snapshot
    pub fn view(&self) -> RoundView {
        RoundView {
            phase: self.phase(),
            credits: self.bankroll.credits,
            bet: self.effective_bet(),
            reels: self.reel_set.reels.clone(),
            stop_offsets: self.reel_set.stop_offsets.clone(),
            spinning: self.spinning.clone(),
            matrix: self.matrix.clone(),
            winning_lines: self.winning_lines().to_vec(),
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Spend budget on a countdown; true when it ran out
fn consume(remaining_ms: &mut f64, budget: &mut f64) -> bool {
    if *budget >= *remaining_ms {
        *budget -= *remaining_ms;
        *remaining_ms = 0.0;
        true
    } else {
        *remaining_ms -= *budget;
        *budget = 0.0;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::timing::TimingConfig;

    fn ladder() -> BetLadder {
        BetLadder {
            tiers: vec![100, 200, 300, 500, 1000],
            thresholds: vec![100, 400, 700, 1000, 5000],
        }
    }

    fn rules_with(timing: TimingConfig) -> Arc<SlotRules> {
        SlotRules::new(GameConfig {
            timing,
            ..GameConfig::standard()
        })
        .unwrap()
    }

    #[test]
    fn test_effective_bet_clamps_to_credits() {
        let ladder = BetLadder::standard();
        let bankroll = BankrollState::new(450, &ladder);
        assert_eq!(bankroll.effective_bet(&ladder), 100);

        let poor = BankrollState {
            credits: 50,
            current_tier: 0,
            highest_tier: 0,
        };
        assert_eq!(poor.effective_bet(&ladder), 50);
    }

    #[test]
    fn test_floor_never_drops() {
        let ladder = ladder();
        let mut bankroll = BankrollState::new(500, &ladder);
        assert_eq!(bankroll.highest_tier, 1);

        bankroll.credits = 1000;
        assert_eq!(bankroll.raise_floor(&ladder), Some(3));
        assert_eq!(bankroll.current_tier, 3);

        bankroll.credits = 600;
        assert_eq!(bankroll.raise_floor(&ladder), None);
        assert_eq!(bankroll.highest_tier, 3);

        // Tiers 1 and 2 are no longer selectable, tier 4 not yet unlocked
        assert!(!bankroll.change_bet(BetDirection::Down));
        assert!(!bankroll.change_bet(BetDirection::Up));
        assert_eq!(bankroll.current_tier, 3);
        assert_eq!(bankroll.effective_bet(&ladder), 500);
    }

    #[test]
    fn test_bet_selection_pinned_to_floor() {
        let ladder = BetLadder::standard();
        let mut bankroll = BankrollState::new(500, &ladder);
        assert_eq!((bankroll.current_tier, bankroll.highest_tier), (0, 0));

        for _ in 0..4 {
            assert!(!bankroll.change_bet(BetDirection::Up));
        }
        assert_eq!(bankroll.current_tier, 0);
        assert_eq!(bankroll.effective_bet(&ladder), 100);

        // Escalation lifts the selection together with the floor
        bankroll.credits = 2500;
        assert_eq!(bankroll.raise_floor(&ladder), Some(2));
        assert_eq!(bankroll.current_tier, 2);
        assert!(!bankroll.change_bet(BetDirection::Up));
        assert!(!bankroll.change_bet(BetDirection::Down));
    }

    #[test]
    fn test_change_bet_recovers_out_of_shape_selection() {
        let mut above = BankrollState {
            credits: 500,
            current_tier: 3,
            highest_tier: 1,
        };
        assert!(above.change_bet(BetDirection::Up));
        assert_eq!(above.current_tier, 1);

        let mut below = BankrollState {
            credits: 500,
            current_tier: 0,
            highest_tier: 2,
        };
        assert!(below.change_bet(BetDirection::Down));
        assert_eq!(below.current_tier, 2);
    }

    #[test]
    fn test_restore_normalizes_tiers() {
        let rules = SlotRules::new(GameConfig {
            bets: ladder(),
            ..GameConfig::standard()
        })
        .unwrap();
        let session = SlotSession::restore(
            rules,
            BankrollState {
                credits: 1200,
                current_tier: 0,
                highest_tier: 9,
            },
        );
        let bankroll = session.bankroll();
        assert_eq!(bankroll.highest_tier, 4);
        assert_eq!(bankroll.current_tier, 4);
        assert_eq!(session.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_spin_deducts_and_locks() {
        let mut session = SlotSession::with_seed(rules_with(TimingConfig::normal()), 11);
        assert!(session.spin());
        assert_eq!(session.credits(), 400);
        assert_eq!(session.phase(), RoundPhase::Spinning);
        assert!(session.spinning_flags().iter().all(|&s| s));

        // One round in flight
        assert!(!session.spin());
        assert!(!session.change_bet(BetDirection::Up));
        assert_eq!(session.credits(), 400);
    }

    #[test]
    fn test_manual_stops_resolve_on_last_reel() {
        let mut session = SlotSession::with_seed(rules_with(TimingConfig::normal()), 5);
        session.spin();

        for reel in 0..4 {
            assert!(session.stop_next_reel());
            assert!(!session.spinning_flags()[reel]);
            assert_eq!(session.phase(), RoundPhase::Spinning);
        }
        assert!(session.stop_next_reel());
        assert!(session.last_outcome().is_some());
        assert!(!session.stop_next_reel());

        let outcome = session.last_outcome().unwrap().clone();
        assert_eq!(session.credits(), 400 + outcome.total_payout);
        let expected = if outcome.is_win() {
            RoundPhase::Resolving
        } else {
            RoundPhase::Idle
        };
        assert_eq!(session.phase(), expected);
    }

    #[test]
    fn test_manual_timing_does_not_auto_stop() {
        let mut session = SlotSession::with_seed(rules_with(TimingConfig::normal()), 5);
        session.spin();
        session.advance(60_000.0);
        assert_eq!(session.phase(), RoundPhase::Spinning);
        assert!(session.spinning_flags().iter().all(|&s| s));
    }

    #[test]
    fn test_auto_stop_schedule() {
        let mut session = SlotSession::with_seed(rules_with(TimingConfig::turbo()), 9);
        session.spin();

        session.advance(399.0);
        assert!(session.spinning_flags()[0]);
        session.advance(1.0);
        assert!(!session.spinning_flags()[0]);
        assert!(session.spinning_flags()[1]);

        // 500, 600, 700, 800 ms
        session.advance(350.0);
        assert_eq!(session.spinning_flags(), &[false, false, false, false, true]);
        session.advance(50.0);
        assert!(session.last_outcome().is_some());
    }

    #[test]
    fn test_winning_lines_only_while_resolving() {
        let timing = TimingConfig {
            auto_stop: true,
            ..TimingConfig::normal()
        };
        let rules = rules_with(timing);
        for seed in 0..200 {
            let mut session = SlotSession::with_seed(rules.clone(), seed);
            session.spin();
            session.stop_all_reels();
            if session.phase() != RoundPhase::Resolving {
                assert!(session.winning_lines().is_empty());
                continue;
            }
            assert!(!session.winning_lines().is_empty());
            session.advance(2999.0);
            assert_eq!(session.phase(), RoundPhase::Resolving);
            session.advance(1.0);
            assert_eq!(session.phase(), RoundPhase::Idle);
            assert!(session.winning_lines().is_empty());
            return;
        }
        panic!("no winning round in 200 seeds");
    }

    #[test]
    fn test_stats_track_rounds() {
        let mut session = SlotSession::with_seed(rules_with(TimingConfig::instant()), 1);
        let mut paid = 0;
        for _ in 0..3 {
            assert!(session.spin());
            session.advance(0.0);
            paid += session.last_outcome().unwrap().total_payout;
        }
        let stats = session.stats();
        assert_eq!(stats.total_spins, 3);
        assert_eq!(stats.wins + stats.losses, 3);
        assert_eq!(stats.total_win, paid);
    }
}
