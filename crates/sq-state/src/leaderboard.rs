//! Leaderboard stores
//!
//! Scores are kept sorted by descending score (ties keep submission order)
//! and capped at [`MAX_ENTRIES`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Maximum stored entries
pub const MAX_ENTRIES: usize = 100;

/// Maximum name length, in characters
pub const MAX_NAME_CHARS: usize = 20;

/// A ranked score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub timestamp: DateTime<Utc>,
}

/// Rejected submission or unreachable store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LeaderboardError {
    #[error("Name is required")]
    EmptyName,

    #[error("Invalid score: {0}")]
    InvalidScore(f64),

    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

/// Ranked score storage
pub trait LeaderboardStore: Send + Sync {
    /// All entries, best first
    fn entries(&self) -> LeaderboardResult<Vec<LeaderboardEntry>>;

    /// Validate and insert a score, returning the stored entry
    fn submit(&self, name: &str, score: f64) -> LeaderboardResult<LeaderboardEntry>;

    /// Best `n` entries
    fn top(&self, n: usize) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let mut entries = self.entries()?;
        entries.truncate(n);
        Ok(entries)
    }
}

/// Trim and truncate a name, floor a score
pub fn validate_submission(name: &str, score: f64) -> LeaderboardResult<LeaderboardEntry> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LeaderboardError::EmptyName);
    }
    if !score.is_finite() || score < 0.0 {
        return Err(LeaderboardError::InvalidScore(score));
    }

    Ok(LeaderboardEntry {
        name: name.chars().take(MAX_NAME_CHARS).collect(),
        score: score.floor() as u64,
        timestamp: Utc::now(),
    })
}

fn insert_ranked(entries: &mut Vec<LeaderboardEntry>, entry: LeaderboardEntry) {
    entries.push(entry);
    // Stable: equal scores keep submission order
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
}

// ═══════════════════════════════════════════════════════════════════════════
// IN-MEMORY
// ═══════════════════════════════════════════════════════════════════════════

/// Process-local leaderboard
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl LeaderboardStore for InMemoryLeaderboard {
    fn entries(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        Ok(self.entries.read().clone())
    }

    fn submit(&self, name: &str, score: f64) -> LeaderboardResult<LeaderboardEntry> {
        let entry = validate_submission(name, score)?;
        insert_ranked(&mut self.entries.write(), entry.clone());
        Ok(entry)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE
// ═══════════════════════════════════════════════════════════════════════════

/// JSON-file leaderboard, rewritten on every submit
#[derive(Debug)]
pub struct FileLeaderboard {
    path: PathBuf,
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl FileLeaderboard {
    /// Open (or start) a leaderboard file
    pub fn open<P: Into<PathBuf>>(path: P) -> LeaderboardResult<Self> {
        let path = path.into();
        let mut entries: Vec<LeaderboardEntry> = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                LeaderboardError::Unavailable(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(LeaderboardError::Unavailable(e.to_string())),
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);

        log::debug!("Opened leaderboard {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Leaderboard next to the player record
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("squid-slot"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leaderboard.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &[LeaderboardEntry]) -> LeaderboardResult<()> {
        let unavailable = |e: &dyn std::fmt::Display| LeaderboardError::Unavailable(e.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| unavailable(&e))?;
        fs::write(&self.path, json).map_err(|e| unavailable(&e))
    }
}

impl LeaderboardStore for FileLeaderboard {
    fn entries(&self) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        Ok(self.entries.read().clone())
    }

    fn submit(&self, name: &str, score: f64) -> LeaderboardResult<LeaderboardEntry> {
        let entry = validate_submission(name, score)?;
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        insert_ranked(&mut updated, entry.clone());

        if let Err(e) = self.persist(&updated) {
            log::warn!("Leaderboard write failed: {e}");
            return Err(e);
        }
        *entries = updated;
        Ok(entry)
    }
}
