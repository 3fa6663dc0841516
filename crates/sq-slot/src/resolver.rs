//! Round resolution: find winning runs on a visible matrix and price them
//!
//! Two mechanisms exist and a game uses exactly one:
//!
//! - **Free-form**: maximal runs of at least three identical symbols along
//!   rows, columns and both diagonals.
//! - **Paylines**: each registered line is read left to right from its first
//!   spanned reel; the run anchored there pays at its matched length.
//!
//! Payouts are quoted per base bet unit and scaled by `bet / base_bet`,
//! then rounded to whole credits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{PayoutRounding, WinMechanism};
use crate::paylines::PaylineRegistry;
use crate::reels::Grid;
use crate::symbols::{MIN_RUN_LENGTH, SymbolCatalog};

/// A cell of the visible matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Reel (column) index
    pub reel: u8,
    /// Row index (0 = top)
    pub row: u8,
}

impl Position {
    pub fn new(reel: usize, row: usize) -> Self {
        Self {
            reel: reel as u8,
            row: row as u8,
        }
    }
}

/// Where a winning run was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    /// A registered payline
    Payline { index: u16 },
    /// Along a row
    Horizontal { row: u8 },
    /// Down a reel
    Vertical { reel: u8 },
    /// Top-left to bottom-right
    DiagonalDown,
    /// Bottom-left to top-right
    DiagonalUp,
}

/// A single registered win
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Discovery order within the round
    pub line_id: u32,
    /// Direction or payline
    pub kind: LineKind,
    /// Matched symbol
    pub symbol_id: String,
    /// Number of matching cells (≥ 3)
    pub run_length: u8,
    /// Credits paid for this line (> 0)
    pub payout: u64,
    /// Matched cells, in run order
    pub positions: Vec<Position>,
}

/// Result of resolving one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Committed bet
    pub bet: u64,
    /// Sum of all line payouts
    pub total_payout: u64,
    /// Wins in discovery order
    pub winning_lines: Vec<WinningLine>,
}

impl RoundOutcome {
    /// Check if this is a winning round
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self) -> f64 {
        if self.bet == 0 {
            0.0
        } else {
            self.total_payout as f64 / self.bet as f64
        }
    }

    /// Every cell that is part of at least one win
    pub fn winning_positions(&self) -> BTreeSet<Position> {
        self.winning_lines
            .iter()
            .flat_map(|line| line.positions.iter().copied())
            .collect()
    }

    /// Net credit change for the round
    pub fn net(&self) -> i64 {
        self.total_payout as i64 - self.bet as i64
    }
}

/// Evaluates matrices against one catalog and one win mechanism
#[derive(Debug, Clone, Copy)]
pub struct RoundResolver<'a> {
    catalog: &'a SymbolCatalog,
    mechanism: &'a WinMechanism,
    base_bet: u64,
    rounding: PayoutRounding,
}

impl<'a> RoundResolver<'a> {
    pub fn new(
        catalog: &'a SymbolCatalog,
        mechanism: &'a WinMechanism,
        base_bet: u64,
        rounding: PayoutRounding,
    ) -> Self {
        Self {
            catalog,
            mechanism,
            base_bet: base_bet.max(1),
            rounding,
        }
    }

    /// Resolve a matrix (`grid[reel][row]`) at the given bet
    pub fn resolve(&self, grid: &Grid, bet: u64) -> RoundOutcome {
        self.check_symbols(grid);

        let mut lines = Vec::new();
        match self.mechanism {
            WinMechanism::FreeForm => {
                self.scan_horizontal(grid, bet, &mut lines);
                self.scan_vertical(grid, bet, &mut lines);
                self.scan_diagonal_down(grid, bet, &mut lines);
                self.scan_diagonal_up(grid, bet, &mut lines);
            }
            WinMechanism::Paylines { registry } => {
                self.scan_paylines(registry, grid, bet, &mut lines);
            }
        }

        let total_payout = lines.iter().map(|line| line.payout).sum();
        log::debug!(
            "Resolved bet {}: {} winning lines, payout {}",
            bet,
            lines.len(),
            total_payout
        );

        RoundOutcome {
            bet,
            total_payout,
            winning_lines: lines,
        }
    }

    /// Scale a catalog multiplier to whole credits at `bet`
    pub fn scaled_payout(&self, multiplier: f64, bet: u64) -> u64 {
        self.rounding
            .apply(multiplier * bet as f64 / self.base_bet as f64)
    }

    fn check_symbols(&self, grid: &Grid) {
        for (reel, column) in grid.iter().enumerate() {
            for (row, &index) in column.iter().enumerate() {
                let known = self.catalog.get(index).is_some();
                debug_assert!(known, "symbol index {index} at ({reel}, {row}) not in catalog");
                if !known {
                    log::error!("Unknown symbol index {index} at ({reel}, {row}), treated as blank");
                }
            }
        }
    }

    /// Known symbol at a cell, `None` outside the grid or for unknown indices
    fn cell(&self, grid: &Grid, reel: usize, row: usize) -> Option<u32> {
        grid.get(reel)
            .and_then(|column| column.get(row))
            .copied()
            .filter(|&index| self.catalog.get(index).is_some())
    }

    fn register(
        &self,
        lines: &mut Vec<WinningLine>,
        kind: LineKind,
        symbol_index: u32,
        positions: Vec<Position>,
        bet: u64,
    ) {
        let Some(symbol) = self.catalog.get(symbol_index) else {
            return;
        };
        let run_length = positions.len();
        let multiplier = self.catalog.payout_for(symbol, run_length);
        let payout = self.scaled_payout(multiplier, bet);
        if payout == 0 {
            log::trace!("{} x{} on {:?} pays nothing", symbol.id, run_length, kind);
            return;
        }

        lines.push(WinningLine {
            line_id: lines.len() as u32,
            kind,
            symbol_id: symbol.id.clone(),
            run_length: run_length as u8,
            payout,
            positions,
        });
    }

    fn scan_paylines(
        &self,
        registry: &PaylineRegistry,
        grid: &Grid,
        bet: u64,
        lines: &mut Vec<WinningLine>,
    ) {
        for payline in registry {
            let mut cells = payline
                .cells()
                .map(|(reel, row)| (Position { reel, row }, self.cell(grid, reel as usize, row as usize)));

            let Some((first_pos, Some(symbol))) = cells.next() else {
                continue;
            };

            let mut positions = vec![first_pos];
            positions.extend(
                cells
                    .take_while(|&(_, cell)| cell == Some(symbol))
                    .map(|(pos, _)| pos),
            );

            if positions.len() >= MIN_RUN_LENGTH {
                self.register(lines, LineKind::Payline { index: payline.index }, symbol, positions, bet);
            }
        }
    }

    fn scan_horizontal(&self, grid: &Grid, bet: u64, lines: &mut Vec<WinningLine>) {
        let (reels, rows) = dimensions(grid);
        for row in 0..rows {
            let mut reel = 0;
            while reel < reels {
                let Some(symbol) = self.cell(grid, reel, row) else {
                    reel += 1;
                    continue;
                };

                let mut next = reel + 1;
                while next < reels && self.cell(grid, next, row) == Some(symbol) {
                    next += 1;
                }

                if next - reel >= MIN_RUN_LENGTH {
                    let positions = (reel..next).map(|r| Position::new(r, row)).collect();
                    self.register(lines, LineKind::Horizontal { row: row as u8 }, symbol, positions, bet);
                }
                reel = next;
            }
        }
    }

    fn scan_vertical(&self, grid: &Grid, bet: u64, lines: &mut Vec<WinningLine>) {
        let (reels, rows) = dimensions(grid);
        for reel in 0..reels {
            let mut row = 0;
            while row < rows {
                let Some(symbol) = self.cell(grid, reel, row) else {
                    row += 1;
                    continue;
                };

                let mut next = row + 1;
                while next < rows && self.cell(grid, reel, next) == Some(symbol) {
                    next += 1;
                }

                if next - row >= MIN_RUN_LENGTH {
                    let positions = (row..next).map(|r| Position::new(reel, r)).collect();
                    self.register(lines, LineKind::Vertical { reel: reel as u8 }, symbol, positions, bet);
                }
                row = next;
            }
        }
    }

    fn scan_diagonal_down(&self, grid: &Grid, bet: u64, lines: &mut Vec<WinningLine>) {
        let (reels, rows) = dimensions(grid);
        for reel in 0..reels {
            for row in 0..rows {
                let Some(symbol) = self.cell(grid, reel, row) else {
                    continue;
                };
                // Start cells inside a longer run are skipped
                if reel > 0 && row > 0 && self.cell(grid, reel - 1, row - 1) == Some(symbol) {
                    continue;
                }

                let mut positions = vec![Position::new(reel, row)];
                let (mut r, mut w) = (reel + 1, row + 1);
                while r < reels && w < rows && self.cell(grid, r, w) == Some(symbol) {
                    positions.push(Position::new(r, w));
                    r += 1;
                    w += 1;
                }

                if positions.len() >= MIN_RUN_LENGTH {
                    self.register(lines, LineKind::DiagonalDown, symbol, positions, bet);
                }
            }
        }
    }

    fn scan_diagonal_up(&self, grid: &Grid, bet: u64, lines: &mut Vec<WinningLine>) {
        let (reels, rows) = dimensions(grid);
        for reel in 0..reels {
            for row in 0..rows {
                let Some(symbol) = self.cell(grid, reel, row) else {
                    continue;
                };
                if reel > 0 && self.cell(grid, reel - 1, row + 1) == Some(symbol) {
                    continue;
                }

                let mut positions = vec![Position::new(reel, row)];
                let mut r = reel + 1;
                let mut w = row;
                while r < reels && w > 0 && self.cell(grid, r, w - 1) == Some(symbol) {
                    w -= 1;
                    positions.push(Position::new(r, w));
                    r += 1;
                }

                if positions.len() >= MIN_RUN_LENGTH {
                    self.register(lines, LineKind::DiagonalUp, symbol, positions, bet);
                }
            }
        }
    }
}

/// (reels, tallest column)
fn dimensions(grid: &Grid) -> (usize, usize) {
    let rows = grid.iter().map(Vec::len).max().unwrap_or(0);
    (grid.len(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paylines::Payline;
    use crate::symbols::Symbol;

    const A: u32 = 0;
    const B: u32 = 1;
    const C: u32 = 2;
    const D: u32 = 3;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new(
            vec![
                Symbol::new("A", "A", "", &[(3, 100.0), (4, 500.0), (5, 2000.0)]),
                Symbol::new("B", "B", "", &[(3, 10.0), (4, 20.0), (5, 50.0)]),
                Symbol::new("C", "C", "", &[(3, 1.0), (5, 3.0)]),
                Symbol::new("D", "D", "", &[(3, 2.5)]),
            ],
            &[],
        )
        .unwrap()
    }

    /// Build `grid[reel][row]` from rows written top to bottom
    fn grid(rows: &[[u32; 5]]) -> Grid {
        (0..5).map(|reel| rows.iter().map(|row| row[reel]).collect()).collect()
    }

    #[test]
    fn test_middle_row_five_of_a_kind() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        let matrix = grid(&[[B, C, B, C, B], [A, A, A, A, A], [C, B, C, B, C]]);
        let outcome = resolver.resolve(&matrix, 200);

        assert_eq!(outcome.winning_lines.len(), 1);
        let line = &outcome.winning_lines[0];
        assert_eq!(line.kind, LineKind::Horizontal { row: 1 });
        assert_eq!(line.symbol_id, "A");
        assert_eq!(line.run_length, 5);
        assert_eq!(line.payout, 4000);
        assert_eq!(outcome.total_payout, 4000);
        assert_eq!(line.positions.len(), 5);
    }

    #[test]
    fn test_no_win_matrix() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        let matrix = grid(&[[A, B, C, D, A], [B, C, D, A, B], [D, A, B, C, D]]);
        let outcome = resolver.resolve(&matrix, 100);
        assert!(!outcome.is_win());
        assert!(outcome.winning_lines.is_empty());
        assert_eq!(outcome.win_ratio(), 0.0);
        assert_eq!(outcome.net(), -100);
    }

    #[test]
    fn test_vertical_and_diagonal_runs() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        // Reel 0 is all B; A runs down-right from (2,0); D runs up-right from (1,2)
        let matrix = grid(&[[B, C, A, D, C], [B, C, D, A, C], [B, D, C, C, A]]);
        let outcome = resolver.resolve(&matrix, 100);

        let kinds: Vec<_> = outcome.winning_lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LineKind::Vertical { reel: 0 }, LineKind::DiagonalDown, LineKind::DiagonalUp]
        );
        assert_eq!(outcome.winning_lines[1].positions[0], Position::new(2, 0));
        assert_eq!(outcome.winning_lines[2].positions, vec![
            Position::new(1, 2),
            Position::new(2, 1),
            Position::new(3, 0)
        ]);
        // Ids follow discovery order
        for (i, line) in outcome.winning_lines.iter().enumerate() {
            assert_eq!(line.line_id as usize, i);
        }
        assert_eq!(outcome.total_payout, 10 + 100 + 2);
    }

    #[test]
    fn test_diagonal_counted_once() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        // A on (0,0),(1,1),(2,2): the continuation cells must not start new runs
        let matrix = grid(&[[A, B, C, B, C], [C, A, D, C, B], [B, D, A, D, B]]);
        let outcome = resolver.resolve(&matrix, 100);
        assert_eq!(outcome.winning_lines.len(), 1);
        assert_eq!(outcome.winning_lines[0].kind, LineKind::DiagonalDown);
        assert_eq!(outcome.winning_lines[0].run_length, 3);
    }

    #[test]
    fn test_run_pays_exact_length_only() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        // Four C in a row: C has no entry for 4, so nothing is registered
        let matrix = grid(&[[C, C, C, C, A], [A, B, A, B, B], [B, A, B, A, D]]);
        let outcome = resolver.resolve(&matrix, 100);
        assert!(outcome.winning_lines.is_empty());
        assert_eq!(outcome.total_payout, 0);
    }

    #[test]
    fn test_floor_rounding() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let matrix = grid(&[[D, D, D, A, C], [A, B, C, B, C], [B, A, B, C, A]]);

        // 2.5 × 300 / 100 = 7.5
        let floor = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);
        assert_eq!(floor.resolve(&matrix, 300).total_payout, 7);

        let nearest = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Nearest);
        assert_eq!(nearest.resolve(&matrix, 300).total_payout, 8);

        // Clamped bet: 2.5 × 30 / 100 = 0.75 floors to nothing
        let outcome = floor.resolve(&matrix, 30);
        assert!(outcome.winning_lines.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        let matrix = grid(&[[A, A, A, A, A], [A, A, A, A, A], [A, A, A, A, A]]);
        let outcome = resolver.resolve(&matrix, 100);

        // 3 rows + 5 reels + 3 diagonals each way
        assert_eq!(outcome.winning_lines.len(), 14);
        let sum: u64 = outcome.winning_lines.iter().map(|l| l.payout).sum();
        assert_eq!(outcome.total_payout, sum);
        assert_eq!(outcome.total_payout, 3 * 2000 + 5 * 100 + 6 * 100);
        assert_eq!(outcome.winning_positions().len(), 15);
        for line in &outcome.winning_lines {
            assert!(line.run_length >= 3);
            assert_eq!(line.run_length as usize, line.positions.len());
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        let matrix = grid(&[[A, A, A, B, B], [B, A, C, C, C], [A, B, A, D, C]]);
        let first = resolver.resolve(&matrix, 500);
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&matrix, 500), first);
        }
    }

    #[test]
    fn test_paylines_left_anchored() {
        let catalog = catalog();
        let mechanism = WinMechanism::Paylines {
            registry: PaylineRegistry::new(vec![
                Payline::full(0, "middle", &[1, 1, 1, 1, 1]),
                Payline::full(1, "top", &[0, 0, 0, 0, 0]),
                Payline::partial(2, "right top", 2, &[0, 0, 0], 5),
            ]),
        };
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);

        // Middle: A A A A B → 4 from the left. Top: B C A A A → not anchored,
        // but the right-hand sub-line starting at reel 2 catches it.
        let matrix = grid(&[[B, C, A, A, A], [A, A, A, A, B], [C, D, C, D, C]]);
        let outcome = resolver.resolve(&matrix, 100);

        assert_eq!(outcome.winning_lines.len(), 2);
        assert_eq!(outcome.winning_lines[0].kind, LineKind::Payline { index: 0 });
        assert_eq!(outcome.winning_lines[0].run_length, 4);
        assert_eq!(outcome.winning_lines[0].payout, 500);
        assert_eq!(outcome.winning_lines[1].kind, LineKind::Payline { index: 2 });
        assert_eq!(outcome.winning_lines[1].positions[0], Position::new(2, 0));
        assert_eq!(outcome.total_payout, 600);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not in catalog")]
    fn test_unknown_symbol_asserts_in_debug() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);
        let matrix = grid(&[[A, A, A, 99, B], [B, C, D, A, B], [C, D, A, B, C]]);
        resolver.resolve(&matrix, 100);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_unknown_symbol_is_blank_in_release() {
        let catalog = catalog();
        let mechanism = WinMechanism::FreeForm;
        let resolver = RoundResolver::new(&catalog, &mechanism, 100, PayoutRounding::Floor);
        let matrix = grid(&[[A, A, A, 99, B], [B, C, D, A, B], [C, D, A, B, C]]);
        let outcome = resolver.resolve(&matrix, 100);
        assert_eq!(outcome.winning_lines.len(), 1);
        assert_eq!(outcome.total_payout, 100);
    }
}
