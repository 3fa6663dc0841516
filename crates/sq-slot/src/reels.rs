//! Reel strips, stop offsets and the visible matrix

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::SymbolCatalog;

/// Visible symbols, indexed `grid[reel][row]` (catalog indices)
pub type Grid = Vec<Vec<u32>>;

/// A generated reel strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reel {
    /// Reel index (0 = leftmost)
    pub reel_index: u8,
    /// Symbol indices, top to bottom
    pub symbols: Vec<u32>,
}

impl Reel {
    /// Create a new reel
    pub fn new(reel_index: u8, symbols: Vec<u32>) -> Self {
        Self {
            reel_index,
            symbols,
        }
    }

    /// Get strip length
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Largest valid stop offset for a window of `rows`
    pub fn max_stop_offset(&self, rows: usize) -> Option<usize> {
        // At least one row beyond the window
        if self.symbols.len() < rows + 1 {
            return None;
        }
        Some(self.symbols.len() - rows)
    }

    /// Visible slice `[offset, offset + rows)`
    pub fn window(&self, offset: usize, rows: usize) -> Option<&[u32]> {
        self.symbols.get(offset..offset.checked_add(rows)?)
    }
}

/// Draw a reel by uniform sampling (with replacement) from the catalog pool
pub fn generate_reel<R: Rng>(
    rng: &mut R,
    reel_index: u8,
    length: usize,
    catalog: &SymbolCatalog,
) -> Reel {
    let pool = catalog.reel_pool();
    let symbols = (0..length)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect();
    Reel::new(reel_index, symbols)
}

/// Pick a stop offset uniformly in `[0, len - rows]`
pub fn choose_stop_offset<R: Rng>(
    rng: &mut R,
    reel: &Reel,
    rows: usize,
) -> SlotResult<usize> {
    let max = reel.max_stop_offset(rows).ok_or(SlotError::ReelTooShort {
        reel_index: reel.reel_index,
        length: reel.len(),
        required: rows + 1,
    })?;
    Ok(rng.random_range(0..=max))
}

/// All reels of one spin and where they stop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelSet {
    /// One strip per reel
    pub reels: Vec<Reel>,
    /// Stop offset per reel
    pub stop_offsets: Vec<usize>,
}

impl ReelSet {
    /// Extract the visible matrix
    pub fn matrix(&self, rows: usize) -> SlotResult<Grid> {
        if self.reels.len() != self.stop_offsets.len() {
            return Err(SlotError::GridMismatch(format!(
                "{} reels but {} stop offsets",
                self.reels.len(),
                self.stop_offsets.len()
            )));
        }

        self.reels
            .iter()
            .zip(&self.stop_offsets)
            .map(|(reel, &offset)| {
                reel.window(offset, rows)
                    .map(<[u32]>::to_vec)
                    .ok_or_else(|| {
                        SlotError::GridMismatch(format!(
                            "offset {offset} out of range for reel {} (length {})",
                            reel.reel_index,
                            reel.len()
                        ))
                    })
            })
            .collect()
    }
}

/// Builds fresh strips and stop offsets for every spin
#[derive(Debug, Clone, Copy)]
pub struct ReelGenerator {
    /// Symbols per generated strip
    pub strip_length: usize,
    /// Number of reels
    pub reels: u8,
    /// Visible rows per reel
    pub rows: u8,
}

impl ReelGenerator {
    /// Create a generator
    pub fn new(strip_length: usize, reels: u8, rows: u8) -> Self {
        Self {
            strip_length,
            reels,
            rows,
        }
    }

    /// Generate new strips and choose their stop offsets
    pub fn spin<R: Rng>(&self, rng: &mut R, catalog: &SymbolCatalog) -> SlotResult<ReelSet> {
        let mut reels = Vec::with_capacity(self.reels as usize);
        let mut stop_offsets = Vec::with_capacity(self.reels as usize);

        for reel_index in 0..self.reels {
            let reel = generate_reel(rng, reel_index, self.strip_length, catalog);
            stop_offsets.push(choose_stop_offset(rng, &reel, self.rows as usize)?);
            reels.push(reel);
        }

        log::debug!("Generated {} reels, stop offsets {:?}", reels.len(), stop_offsets);

        Ok(ReelSet {
            reels,
            stop_offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_stop_offset_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let catalog = SymbolCatalog::standard();

        for length in 4..24 {
            let reel = generate_reel(&mut rng, 0, length, &catalog);
            let mut seen_max = false;
            for _ in 0..500 {
                let offset = choose_stop_offset(&mut rng, &reel, 3).unwrap();
                assert!(offset <= length - 3);
                seen_max |= offset == length - 3;
            }
            // Upper bound is inclusive
            assert!(seen_max, "offset {} never chosen for length {length}", length - 3);
        }
    }

    #[test]
    fn test_reel_too_short() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let reel = Reel::new(2, vec![0, 1, 2]);
        assert_eq!(
            choose_stop_offset(&mut rng, &reel, 3),
            Err(SlotError::ReelTooShort {
                reel_index: 2,
                length: 3,
                required: 4
            })
        );
    }

    #[test]
    fn test_generate_reel_uses_pool_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let catalog = SymbolCatalog::standard();
        let reel = generate_reel(&mut rng, 0, 200, &catalog);
        assert_eq!(reel.len(), 200);
        assert!(reel.symbols.iter().all(|&s| (s as usize) < catalog.len()));
    }

    #[test]
    fn test_matrix_extraction() {
        let set = ReelSet {
            reels: vec![Reel::new(0, vec![0, 1, 2, 3]), Reel::new(1, vec![4, 5, 0, 1])],
            stop_offsets: vec![1, 0],
        };
        let grid = set.matrix(3).unwrap();
        assert_eq!(grid, vec![vec![1, 2, 3], vec![4, 5, 0]]);

        let bad = ReelSet {
            reels: set.reels.clone(),
            stop_offsets: vec![2, 0],
        };
        assert!(matches!(bad.matrix(3), Err(SlotError::GridMismatch(_))));
    }

    #[test]
    fn test_generator_is_seed_deterministic() {
        let catalog = SymbolCatalog::standard();
        let generator = ReelGenerator::new(20, 5, 3);
        let a = generator.spin(&mut ChaCha8Rng::seed_from_u64(42), &catalog).unwrap();
        let b = generator.spin(&mut ChaCha8Rng::seed_from_u64(42), &catalog).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.reels.len(), 5);
        assert!(a.stop_offsets.iter().all(|&o| o <= 17));
    }
}
