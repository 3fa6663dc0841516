//! Plain-text rendering of the machine, paytable and leaderboard

use sq_slot::{Position, RoundPhase, RoundView, SessionEvent, SimulationReport, SymbolCatalog};
use sq_state::LeaderboardEntry;

const CELL_WIDTH: usize = 9;

/// Draw the visible matrix; winning cells are bracketed, spinning reels blurred
pub fn render_view(view: &RoundView, catalog: &SymbolCatalog) -> String {
    let winners: Vec<Position> = view
        .winning_lines
        .iter()
        .flat_map(|line| line.positions.iter().copied())
        .collect();
    let rows = view.matrix.iter().map(Vec::len).max().unwrap_or(0);

    let border = "─".repeat(CELL_WIDTH * view.matrix.len().max(1));
    let mut out = format!("┌{border}┐\n");
    for row in 0..rows {
        out.push('│');
        for (reel, column) in view.matrix.iter().enumerate() {
            let spinning = view.spinning.get(reel).copied().unwrap_or(false);
            let label = if spinning {
                "~~~~~".to_string()
            } else {
                column
                    .get(row)
                    .and_then(|&index| catalog.get(index))
                    .map_or_else(|| "?".to_string(), |symbol| symbol.id.clone())
            };
            let label = if winners.contains(&Position::new(reel, row)) {
                format!("[{label}]")
            } else {
                label
            };
            out.push_str(&format!("{label:^CELL_WIDTH$}"));
        }
        out.push_str("│\n");
    }
    out.push_str(&format!("└{border}┘\n"));

    let phase = match view.phase {
        RoundPhase::Idle => "ready",
        RoundPhase::Spinning => "spinning",
        RoundPhase::Resolving => "paying",
        RoundPhase::GameOver => "game over",
    };
    out.push_str(&format!(
        " credits {:>8}   bet {:>5}   {phase}\n",
        view.credits, view.bet
    ));
    out
}

/// Human-readable line for an event, if it deserves one
pub fn describe_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::RoundResolved { outcome, .. } if outcome.is_win() => {
            let lines: String = outcome
                .winning_lines
                .iter()
                .map(|line| {
                    format!(
                        "\n  {} x{} ({:?}) +{}",
                        line.symbol_id, line.run_length, line.kind, line.payout
                    )
                })
                .collect();
            Some(format!("WIN {} credits{lines}", outcome.total_payout))
        }
        SessionEvent::NoWin => Some("oops, no win".into()),
        SessionEvent::BetFloorRaised { bet, .. } => Some(format!("Bet floor raised to {bet}")),
        SessionEvent::BetChanged { bet, .. } => Some(format!("Bet set to {bet}")),
        SessionEvent::GameOver { credits } => Some(format!("GAME OVER ({credits} credits left)")),
        SessionEvent::SessionReset { credits } => Some(format!("New game with {credits} credits")),
        _ => None,
    }
}

/// Payout table, one row per symbol
pub fn render_paytable(catalog: &SymbolCatalog, base_bet: u64) -> String {
    let lengths: Vec<u8> = {
        let mut all: Vec<u8> = catalog
            .symbols()
            .iter()
            .flat_map(|symbol| symbol.payouts.keys().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    };

    let mut out = format!("Payouts per {base_bet} bet\n{:<10}", "symbol");
    for len in &lengths {
        out.push_str(&format!("{:>10}", format!("x{len}")));
    }
    out.push('\n');

    for symbol in catalog.symbols() {
        out.push_str(&format!("{:<10}", symbol.id));
        for &len in &lengths {
            out.push_str(&format!("{:>10}", symbol.get_pay(len as usize)));
        }
        let weight = catalog.pool_weight(&symbol.id) * 100.0;
        out.push_str(&format!("   ({weight:.1}% of reel)\n"));
    }
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No scores yet\n".into();
    }
    entries
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            format!(
                "{:>3}. {:<20} {:>10}  {}\n",
                rank + 1,
                entry.name,
                entry.score,
                entry.timestamp.format("%Y-%m-%d")
            )
        })
        .collect()
}

pub fn render_report(report: &SimulationReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str(&format!("spins        {}\n", stats.total_spins));
    out.push_str(&format!("bet          {}\n", report.bet));
    out.push_str(&format!("total bet    {}\n", stats.total_bet));
    out.push_str(&format!("total win    {}\n", stats.total_win));
    out.push_str(&format!("RTP          {:.2}%\n", report.rtp()));
    out.push_str(&format!("hit rate     {:.2}%\n", report.hit_rate()));
    out.push_str(&format!("biggest win  {}\n", stats.biggest_win));
    for (symbol, wins) in &report.symbol_wins {
        out.push_str(&format!(
            "  {symbol:<8} {wins:>8} lines  {:>6.2}% of payout\n",
            report.payout_share(symbol) * 100.0
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sq_slot::{LineKind, RoundOutcome, WinningLine};

    fn view() -> RoundView {
        RoundView {
            phase: RoundPhase::Resolving,
            credits: 900,
            bet: 100,
            reels: Vec::new(),
            stop_offsets: Vec::new(),
            spinning: vec![false, false, false],
            matrix: vec![vec![2, 0, 1], vec![2, 1, 0], vec![2, 3, 4]],
            winning_lines: vec![WinningLine {
                line_id: 0,
                kind: LineKind::Horizontal { row: 0 },
                symbol_id: "ika".into(),
                run_length: 3,
                payout: 150,
                positions: vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)],
            }],
        }
    }

    #[test]
    fn test_render_marks_winners() {
        let text = render_view(&view(), &SymbolCatalog::standard());
        let top = text.lines().nth(1).unwrap();
        assert_eq!(top.matches("[ika]").count(), 3);
        assert!(text.contains("credits      900"));
        assert!(text.contains("paying"));
    }

    #[test]
    fn test_render_spinning_reel() {
        let mut view = view();
        view.spinning = vec![false, true, false];
        view.winning_lines.clear();
        let text = render_view(&view, &SymbolCatalog::standard());
        assert_eq!(text.matches("~~~~~").count(), 3);
    }

    #[test]
    fn test_describe_events() {
        let outcome = RoundOutcome {
            bet: 100,
            total_payout: 150,
            winning_lines: view().winning_lines,
        };
        let text = describe_event(&SessionEvent::RoundResolved { outcome, credits: 900 }).unwrap();
        assert!(text.starts_with("WIN 150"));
        assert!(describe_event(&SessionEvent::WinPresentationEnded).is_none());
    }

    #[test]
    fn test_paytable_lists_all_symbols() {
        let text = render_paytable(&SymbolCatalog::standard(), 100);
        for id in ["ooto", "yasuo", "ika", "tori", "abebe", "kiyo"] {
            assert!(text.contains(id));
        }
        assert!(text.contains("77777"));
    }

    #[test]
    fn test_leaderboard_and_report_text() {
        use sq_slot::{Simulator, SlotRules};
        use sq_state::{InMemoryLeaderboard, LeaderboardStore};

        assert_eq!(render_leaderboard(&[]), "No scores yet\n");

        let board = InMemoryLeaderboard::new();
        board.submit("kiyo", 300.0).unwrap();
        board.submit("ooto", 9000.0).unwrap();
        let text = render_leaderboard(&board.entries().unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. ooto"));
        assert!(lines[1].starts_with("  2. kiyo"));

        let report = Simulator::new(SlotRules::standard().unwrap(), 3)
            .run(200, 0)
            .unwrap();
        let text = render_report(&report);
        assert!(text.starts_with("spins        200\n"));
        assert!(text.contains("bet          100\n"));
        assert_eq!(text.lines().count(), 7 + report.symbol_wins.len());
    }
}
