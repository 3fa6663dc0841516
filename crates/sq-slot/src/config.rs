//! Game configuration and the validated rule set built from it

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::paylines::PaylineRegistry;
use crate::reels::ReelGenerator;
use crate::resolver::RoundResolver;
use crate::symbols::{Symbol, SymbolCatalog, standard_symbols};
use crate::timing::TimingConfig;

/// Grid specification (reels × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
}

impl GridSpec {
    /// Standard 5×3
    pub fn standard_5x3() -> Self {
        Self { reels: 5, rows: 3 }
    }

    /// Total grid positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// Bet tiers and the credit thresholds that unlock them
///
/// `thresholds[i]` is the credit balance at which tier `i` becomes the bet
/// floor. Both lists are ascending and have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLadder {
    /// Bet amount per tier (ascending)
    pub tiers: Vec<u64>,
    /// Credits needed to reach each tier (ascending)
    pub thresholds: Vec<u64>,
}

impl BetLadder {
    /// Default ladder: 100 → 1000
    pub fn standard() -> Self {
        Self {
            tiers: vec![100, 200, 300, 500, 1000],
            thresholds: vec![500, 1000, 2000, 5000, 10000],
        }
    }

    /// Smallest tier, the unit payouts are normalised to
    pub fn base_bet(&self) -> u64 {
        self.tiers.first().copied().unwrap_or(0)
    }

    /// Bet amount of a tier (clamped to the top tier)
    pub fn tier_amount(&self, tier: usize) -> u64 {
        self.tiers
            .get(tier.min(self.tiers.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0)
    }

    /// Highest tier whose threshold `credits` reaches (0 if none)
    pub fn tier_for_credits(&self, credits: u64) -> usize {
        self.thresholds
            .iter()
            .rposition(|&threshold| credits >= threshold)
            .unwrap_or(0)
    }

    /// Index of the top tier
    pub fn top_tier(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    /// Number of tiers
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Check ordering and lengths
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |msg: &str| Err(ConfigError::InvalidBetLadder(msg.to_string()));
        if self.tiers.is_empty() {
            return invalid("no bet tiers");
        }
        if self.tiers[0] == 0 {
            return invalid("lowest bet must be positive");
        }
        if self.tiers.windows(2).any(|w| w[0] >= w[1]) {
            return invalid("bet tiers must be strictly ascending");
        }
        if self.thresholds.len() != self.tiers.len() {
            return invalid("one threshold per tier required");
        }
        if self.thresholds.windows(2).any(|w| w[0] > w[1]) {
            return invalid("thresholds must be ascending");
        }
        Ok(())
    }
}

impl Default for BetLadder {
    fn default() -> Self {
        Self::standard()
    }
}

/// How winning runs are found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WinMechanism {
    /// Maximal runs along rows, columns and both diagonals
    FreeForm,
    /// Fixed lines, left-anchored runs
    Paylines {
        /// Lines in evaluation order
        registry: PaylineRegistry,
    },
}

impl WinMechanism {
    /// Standard 20 fixed lines (5 full + 15 three-reel)
    pub fn standard_paylines() -> Self {
        Self::Paylines {
            registry: PaylineRegistry::standard_5x3(),
        }
    }

    /// Is this a fixed-line mechanism?
    pub fn is_paylines(&self) -> bool {
        matches!(self, Self::Paylines { .. })
    }
}

impl Default for WinMechanism {
    fn default() -> Self {
        Self::FreeForm
    }
}

/// Rounding applied to scaled payouts (credits are whole numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutRounding {
    /// Truncate fractional credits (house keeps the fraction)
    Floor,
    /// Round half away from zero
    Nearest,
}

impl PayoutRounding {
    /// Apply to a raw scaled payout
    pub fn apply(self, raw: f64) -> u64 {
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        let rounded = match self {
            Self::Floor => raw.floor(),
            Self::Nearest => raw.round(),
        };
        rounded as u64
    }
}

impl Default for PayoutRounding {
    fn default() -> Self {
        Self::Floor
    }
}

/// Complete game definition, as loaded from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name
    pub name: String,

    /// Grid configuration
    #[serde(default)]
    pub grid: GridSpec,

    /// Symbols per generated reel strip
    #[serde(default = "default_strip_length")]
    pub strip_length: usize,

    /// Symbol definitions
    #[serde(default = "standard_symbols")]
    pub symbols: Vec<Symbol>,

    /// Sampling pool by symbol id (empty = each symbol once)
    #[serde(default)]
    pub reel_pool: Vec<String>,

    /// Win evaluation mechanism
    #[serde(default)]
    pub win_mechanism: WinMechanism,

    /// Bet tiers and thresholds
    #[serde(default)]
    pub bets: BetLadder,

    /// Starting stake (also the reset stake after game over)
    #[serde(default = "default_initial_credits")]
    pub initial_credits: u64,

    /// Payout rounding rule
    #[serde(default)]
    pub rounding: PayoutRounding,

    /// Timing configuration
    #[serde(default)]
    pub timing: TimingConfig,

    /// High-score milestones worth recording
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u64>,
}

fn default_strip_length() -> usize {
    20
}

fn default_initial_credits() -> u64 {
    500
}

fn default_milestones() -> Vec<u64> {
    BetLadder::standard().thresholds
}

impl GameConfig {
    /// The Squid Story game: 5×3, free-form runs, floor rounding
    pub fn standard() -> Self {
        Self {
            name: "Squid Story".into(),
            grid: GridSpec::standard_5x3(),
            strip_length: default_strip_length(),
            symbols: standard_symbols(),
            reel_pool: Vec::new(),
            win_mechanism: WinMechanism::FreeForm,
            bets: BetLadder::standard(),
            initial_credits: default_initial_credits(),
            rounding: PayoutRounding::Floor,
            timing: TimingConfig::normal(),
            milestones: default_milestones(),
        }
    }

    /// Parse JSON
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse YAML
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate everything except the catalog (checked when it is built)
    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid.reels == 0 || self.grid.rows == 0 {
            return Err(ConfigError::InvalidGrid(format!(
                "{}x{} has no cells",
                self.grid.reels, self.grid.rows
            )));
        }
        if self.strip_length < self.grid.rows as usize + 1 {
            return Err(ConfigError::StripTooShort {
                strip_length: self.strip_length,
                rows: self.grid.rows,
            });
        }
        self.bets.validate()?;
        if self.initial_credits < self.bets.base_bet() {
            return Err(ConfigError::InitialCreditsTooLow {
                credits: self.initial_credits,
                base_bet: self.bets.base_bet(),
            });
        }
        if let WinMechanism::Paylines { registry } = &self.win_mechanism {
            if registry.is_empty() {
                return Err(ConfigError::InvalidGrid("payline mechanism without lines".into()));
            }
            registry.validate(&self.grid)?;
        }
        self.timing.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validated, immutable rule set shared by sessions and simulations
#[derive(Debug)]
pub struct SlotRules {
    config: GameConfig,
    catalog: SymbolCatalog,
}

impl SlotRules {
    /// Validate a config and build its catalog
    pub fn new(config: GameConfig) -> ConfigResult<Arc<Self>> {
        config.validate()?;
        let catalog = SymbolCatalog::new(config.symbols.clone(), &config.reel_pool)?;
        log::info!(
            "Loaded '{}': {}x{} grid, {} symbols, {} bet tiers, {:?}",
            config.name,
            config.grid.reels,
            config.grid.rows,
            catalog.len(),
            config.bets.len(),
            config.rounding
        );
        Ok(Arc::new(Self { config, catalog }))
    }

    /// The standard game
    pub fn standard() -> ConfigResult<Arc<Self>> {
        Self::new(GameConfig::standard())
    }

    /// Get config
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get catalog
    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// Grid dimensions
    pub fn grid(&self) -> GridSpec {
        self.config.grid
    }

    /// Bet ladder
    pub fn bets(&self) -> &BetLadder {
        &self.config.bets
    }

    /// Timing configuration
    pub fn timing(&self) -> &TimingConfig {
        &self.config.timing
    }

    /// Reel generator for this grid
    pub fn reel_generator(&self) -> ReelGenerator {
        ReelGenerator::new(self.config.strip_length, self.config.grid.reels, self.config.grid.rows)
    }

    /// Resolver bound to this catalog and mechanism
    pub fn resolver(&self) -> RoundResolver<'_> {
        RoundResolver::new(
            &self.catalog,
            &self.config.win_mechanism,
            self.config.bets.base_bet(),
            self.config.rounding,
        )
    }
}
