//! Symbol definitions and the symbol catalog

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SlotError, SlotResult};

/// Shortest run that can pay
pub const MIN_RUN_LENGTH: usize = 3;

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID (e.g., "ika")
    pub id: String,
    /// Display name
    pub name: String,
    /// Asset reference for the renderer (emoji or image path)
    #[serde(default)]
    pub asset: String,
    /// Run length → payout multiplier (per base bet unit)
    #[serde(default)]
    pub payouts: BTreeMap<u8, f64>,
}

impl Symbol {
    /// Create a symbol from `(run_length, multiplier)` pairs
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        asset: impl Into<String>,
        pays: &[(u8, f64)],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset: asset.into(),
            payouts: pays.iter().copied().collect(),
        }
    }

    /// Get pay value for a run length (0 when unlisted or shorter than 3)
    pub fn get_pay(&self, run_length: usize) -> f64 {
        if run_length < MIN_RUN_LENGTH {
            return 0.0;
        }
        u8::try_from(run_length)
            .ok()
            .and_then(|len| self.payouts.get(&len))
            .copied()
            .unwrap_or(0.0)
    }

    /// Longest run length with a payout entry
    pub fn max_paying_run(&self) -> Option<u8> {
        self.payouts
            .iter()
            .rev()
            .find(|&(_, &pay)| pay > 0.0)
            .map(|(&len, _)| len)
    }
}

/// Closed registry of symbols plus the pool reels are sampled from
///
/// Symbols are addressed by their position in the catalog (`u32` index).
/// The reel pool lists indices, possibly repeated: repetition is the only
/// way to make a symbol more frequent on generated reels.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
    index: HashMap<String, u32>,
    reel_pool: Vec<u32>,
}

impl SymbolCatalog {
    /// Build a catalog; an empty `reel_pool` means every symbol once
    pub fn new(symbols: Vec<Symbol>, reel_pool: &[String]) -> ConfigResult<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            Self::validate_payouts(symbol)?;
            if index.insert(symbol.id.clone(), i as u32).is_some() {
                return Err(ConfigError::DuplicateSymbol(symbol.id.clone()));
            }
        }

        let reel_pool = if reel_pool.is_empty() {
            (0..symbols.len() as u32).collect()
        } else {
            reel_pool
                .iter()
                .map(|id| {
                    index
                        .get(id)
                        .copied()
                        .ok_or_else(|| ConfigError::UnknownSymbol(id.clone()))
                })
                .collect::<ConfigResult<Vec<_>>>()?
        };

        Ok(Self {
            symbols,
            index,
            reel_pool,
        })
    }

    fn validate_payouts(symbol: &Symbol) -> ConfigResult<()> {
        for (&run_length, &pay) in &symbol.payouts {
            if (run_length as usize) < MIN_RUN_LENGTH {
                return Err(ConfigError::InvalidPayout {
                    symbol: symbol.id.clone(),
                    run_length,
                    reason: format!("run length must be at least {MIN_RUN_LENGTH}"),
                });
            }
            if !pay.is_finite() || pay < 0.0 {
                return Err(ConfigError::InvalidPayout {
                    symbol: symbol.id.clone(),
                    run_length,
                    reason: format!("multiplier {pay} must be finite and non-negative"),
                });
            }
        }
        Ok(())
    }

    /// The Squid Story catalog
    pub fn standard() -> Self {
        let symbols = standard_symbols();
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i as u32))
            .collect();
        let reel_pool = (0..symbols.len() as u32).collect();
        Self {
            symbols,
            index,
            reel_pool,
        }
    }

    /// Look up a symbol by id
    pub fn lookup(&self, id: &str) -> SlotResult<&Symbol> {
        self.index
            .get(id)
            .and_then(|&i| self.symbols.get(i as usize))
            .ok_or_else(|| SlotError::UnknownSymbol(id.to_string()))
    }

    /// Get symbol by catalog index
    pub fn get(&self, index: u32) -> Option<&Symbol> {
        self.symbols.get(index as usize)
    }

    /// Catalog index of a symbol id
    pub fn index_of(&self, id: &str) -> Option<u32> {
        self.index.get(id).copied()
    }

    /// Payout multiplier for a run of `symbol`
    pub fn payout_for(&self, symbol: &Symbol, run_length: usize) -> f64 {
        symbol.get_pay(run_length)
    }

    /// Indices reels are sampled from
    pub fn reel_pool(&self) -> &[u32] {
        &self.reel_pool
    }

    /// All symbols in catalog order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Share of the reel pool taken by a symbol
    pub fn pool_weight(&self, id: &str) -> f64 {
        let Some(target) = self.index_of(id) else {
            return 0.0;
        };
        let hits = self.reel_pool.iter().filter(|&&i| i == target).count();
        hits as f64 / self.reel_pool.len().max(1) as f64
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// The six Squid Story symbols, highest paying first
pub fn standard_symbols() -> Vec<Symbol> {
    vec![
        Symbol::new("ooto", "ooto", "/images/ooto.png", &[(3, 777.0), (4, 7777.0), (5, 77777.0)]),
        Symbol::new("yasuo", "yasuo", "/images/yasuo.png", &[(3, 800.0), (4, 1500.0), (5, 50000.0)]),
        Symbol::new("ika", "ika", "/images/ika.png", &[(3, 150.0), (4, 2400.0), (5, 10000.0)]),
        Symbol::new("tori", "tori", "/images/tori.png", &[(3, 100.0), (4, 3000.0), (5, 5000.0)]),
        Symbol::new("abebe", "abebe", "/images/abebe.png", &[(3, 50.0), (4, 2000.0), (5, 1000.0)]),
        Symbol::new("kiyo", "kiyo", "/images/kiyo.png", &[(3, 1.0), (4, 2.0), (5, 3.0)]),
    ]
}
