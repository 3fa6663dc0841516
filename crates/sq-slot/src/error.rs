//! Error types for the slot engine

use thiserror::Error;

/// Runtime errors raised by the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Symbol id or index not present in the catalog
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Reel strip cannot provide a single valid stop offset
    #[error("Reel {reel_index} too short: length {length}, need at least {required}")]
    ReelTooShort {
        reel_index: u8,
        length: usize,
        required: usize,
    },

    /// Reel set and offsets disagree, or offset out of range
    #[error("Grid mismatch: {0}")]
    GridMismatch(String),
}

/// Startup-time configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Catalog has no symbols or an empty reel pool
    #[error("Symbol catalog is empty")]
    EmptyCatalog,

    /// Two symbols share an id
    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(String),

    /// Reel pool or payline references an id missing from the catalog
    #[error("Unknown symbol in configuration: {0}")]
    UnknownSymbol(String),

    /// Payout entry with a run length below 3 or a bad multiplier
    #[error("Invalid payout for {symbol} x{run_length}: {reason}")]
    InvalidPayout {
        symbol: String,
        run_length: u8,
        reason: String,
    },

    /// Grid dimensions unusable
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Strip length leaves no valid stop offset
    #[error("Strip length {strip_length} must exceed visible rows {rows}")]
    StripTooShort { strip_length: usize, rows: u8 },

    /// Bet ladder malformed
    #[error("Invalid bet ladder: {0}")]
    InvalidBetLadder(String),

    /// Payline out of grid or malformed
    #[error("Invalid payline {index}: {reason}")]
    InvalidPayline { index: u16, reason: String },

    /// Starting stake cannot cover the lowest bet
    #[error("Initial credits {credits} below base bet {base_bet}")]
    InitialCreditsTooLow { credits: u64, base_bet: u64 },

    /// Timing values negative or not finite
    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    /// Configuration file could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type SlotResult<T> = Result<T, SlotError>;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
