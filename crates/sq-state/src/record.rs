//! Local player record: high score and reached milestones

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StateResult;

/// What a credit observation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New high score, if the previous one was beaten
    pub new_high_score: Option<u64>,
    /// Milestones reached for the first time, ascending
    pub new_milestones: Vec<u64>,
}

impl RecordUpdate {
    /// Anything worth saving?
    pub fn is_changed(&self) -> bool {
        self.new_high_score.is_some() || !self.new_milestones.is_empty()
    }
}

/// Persisted per-player record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    /// Highest credit balance ever held
    pub high_score: u64,
    /// Credit milestones ever reached
    pub milestones: BTreeSet<u64>,
    /// Last time the record changed
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlayerRecord {
    /// Load from the standard location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a path; a missing or unreadable file yields an empty record
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No player record at {}", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read player record {}: {e}", path.display());
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Corrupt player record {}, starting fresh: {e}", path.display());
            Self::default()
        })
    }

    /// Save to the standard location
    pub fn save(&self) -> StateResult<()> {
        self.save_to(Self::default_path())
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> StateResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Per-user data directory, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("squid-slot"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("record.json")
    }

    /// Fold a credit balance into the record
    pub fn observe_credits(&mut self, credits: u64, milestones: &[u64]) -> RecordUpdate {
        let mut update = RecordUpdate::default();

        if credits > self.high_score {
            self.high_score = credits;
            update.new_high_score = Some(credits);
        }

        let mut reached: Vec<u64> = milestones
            .iter()
            .copied()
            .filter(|&m| credits >= m && self.milestones.insert(m))
            .collect();
        reached.sort_unstable();
        update.new_milestones = reached;

        if update.is_changed() {
            self.updated_at = Some(Utc::now());
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_credits() {
        let mut record = PlayerRecord::default();
        let milestones = [500, 1000, 2000];

        let update = record.observe_credits(400, &milestones);
        assert_eq!(update.new_high_score, Some(400));
        assert!(update.new_milestones.is_empty());

        let update = record.observe_credits(1200, &milestones);
        assert_eq!(update.new_high_score, Some(1200));
        assert_eq!(update.new_milestones, vec![500, 1000]);

        // Dropping back changes nothing
        let update = record.observe_credits(600, &milestones);
        assert!(!update.is_changed());
        assert_eq!(record.high_score, 1200);
        assert_eq!(record.milestones.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/record.json");

        let mut record = PlayerRecord::default();
        record.observe_credits(2500, &[500, 1000, 2000, 5000]);
        record.save_to(&path).unwrap();

        let loaded = PlayerRecord::load_from(&path);
        assert_eq!(loaded, record);
        assert_eq!(loaded.milestones.iter().copied().collect::<Vec<_>>(), vec![500, 1000, 2000]);
    }

    #[test]
    fn test_missing_or_corrupt_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PlayerRecord::load_from(dir.path().join("absent.json")), PlayerRecord::default());

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(PlayerRecord::load_from(&path), PlayerRecord::default());

        // Older files without milestones still load
        fs::write(&path, r#"{ "high_score": 900 }"#).unwrap();
        let record = PlayerRecord::load_from(&path);
        assert_eq!(record.high_score, 900);
        assert!(record.milestones.is_empty());
    }
}
