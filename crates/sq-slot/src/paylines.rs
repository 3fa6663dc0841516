//! Payline definitions and the payline registry

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::{ConfigError, ConfigResult};
use crate::symbols::MIN_RUN_LENGTH;

/// A payline definition
///
/// One entry per reel: `Some(row)` when the reel is part of the line,
/// `None` when the line does not cover that reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u16,
    /// Display name (e.g., "middle", "v-shape")
    #[serde(default)]
    pub name: String,
    /// Row per reel, `None` outside the span
    pub rows: Vec<Option<u8>>,
}

impl Payline {
    /// Create a full-width line
    pub fn full(index: u16, name: impl Into<String>, rows: &[u8]) -> Self {
        Self {
            index,
            name: name.into(),
            rows: rows.iter().copied().map(Some).collect(),
        }
    }

    /// Create a line spanning `rows.len()` reels starting at `offset`
    pub fn partial(
        index: u16,
        name: impl Into<String>,
        offset: usize,
        rows: &[u8],
        reel_count: usize,
    ) -> Self {
        let mut cells = vec![None; reel_count];
        for (i, &row) in rows.iter().enumerate() {
            if let Some(cell) = cells.get_mut(offset + i) {
                *cell = Some(row);
            }
        }
        Self {
            index,
            name: name.into(),
            rows: cells,
        }
    }

    /// First and last spanned reel (inclusive)
    pub fn span(&self) -> Option<(usize, usize)> {
        let first = self.rows.iter().position(Option::is_some)?;
        let last = self.rows.iter().rposition(Option::is_some)?;
        Some((first, last))
    }

    /// Number of spanned reels
    pub fn width(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Spanned `(reel, row)` cells, left to right
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(reel, row)| row.map(|r| (reel as u8, r)))
    }

    /// Check the line fits the grid and spans contiguous reels
    pub fn validate(&self, grid: &GridSpec) -> ConfigResult<()> {
        let invalid = |reason: String| ConfigError::InvalidPayline {
            index: self.index,
            reason,
        };

        if self.rows.len() != grid.reels as usize {
            return Err(invalid(format!(
                "{} columns, grid has {} reels",
                self.rows.len(),
                grid.reels
            )));
        }
        if let Some(row) = self.cells().map(|(_, row)| row).find(|&row| row >= grid.rows) {
            return Err(invalid(format!("row {row} outside {} visible rows", grid.rows)));
        }
        let (first, last) = self.span().ok_or_else(|| invalid("covers no reels".into()))?;
        if last - first + 1 != self.width() {
            return Err(invalid("spanned reels are not contiguous".into()));
        }
        if self.width() < MIN_RUN_LENGTH {
            return Err(invalid(format!("spans fewer than {MIN_RUN_LENGTH} reels")));
        }
        Ok(())
    }
}

/// Ordered set of paylines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaylineRegistry {
    lines: Vec<Payline>,
}

impl PaylineRegistry {
    /// Wrap a list of lines
    pub fn new(lines: Vec<Payline>) -> Self {
        Self { lines }
    }

    /// The five full-width lines of a 5×3 grid
    pub fn full_width_5x3() -> Self {
        Self::new(full_width_lines())
    }

    /// Full-width lines plus the three-reel sub-lines at offsets 0, 1 and 2
    pub fn standard_5x3() -> Self {
        let mut lines = full_width_lines();
        for (offset, window) in ["left", "middle", "right"].iter().enumerate() {
            for (name, rows) in SHORT_PATTERNS {
                let index = lines.len() as u16;
                lines.push(Payline::partial(
                    index,
                    format!("{name} ({window} 3)"),
                    offset,
                    &rows,
                    5,
                ));
            }
        }
        Self::new(lines)
    }

    /// Validate every line against the grid
    pub fn validate(&self, grid: &GridSpec) -> ConfigResult<()> {
        self.lines.iter().try_for_each(|line| line.validate(grid))
    }

    /// Get a line by position
    pub fn get(&self, index: usize) -> Option<&Payline> {
        self.lines.get(index)
    }

    /// Iterate lines in evaluation order
    pub fn iter(&self) -> std::slice::Iter<'_, Payline> {
        self.lines.iter()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> IntoIterator for &'a PaylineRegistry {
    type Item = &'a Payline;
    type IntoIter = std::slice::Iter<'a, Payline>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

const SHORT_PATTERNS: [(&str, [u8; 3]); 5] = [
    ("top", [0, 0, 0]),
    ("middle", [1, 1, 1]),
    ("bottom", [2, 2, 2]),
    ("diagonal up", [0, 1, 2]),
    ("diagonal down", [2, 1, 0]),
];

fn full_width_lines() -> Vec<Payline> {
    vec![
        Payline::full(0, "middle", &[1, 1, 1, 1, 1]),
        Payline::full(1, "top", &[0, 0, 0, 0, 0]),
        Payline::full(2, "bottom", &[2, 2, 2, 2, 2]),
        Payline::full(3, "v-shape", &[0, 1, 2, 1, 0]),
        Payline::full(4, "inverse v-shape", &[2, 1, 0, 1, 2]),
    ]
}
