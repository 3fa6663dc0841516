//! Squid Story terminal slot machine
//!
//! Usage:
//!   squid-slot play [--name NAME] [--turbo]   - Play interactively
//!   squid-slot simulate -n 100000 -b 100      - Measure RTP and hit rate
//!   squid-slot paytable                       - Show symbol payouts
//!   squid-slot leaderboard                    - Show the best scores

mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sq_slot::{
    BetDirection, GameConfig, RoundPhase, SessionEvent, Simulator, SlotRules, SlotSession,
    SymbolCatalog, TimingConfig,
};
use sq_state::{FileLeaderboard, LeaderboardStore, PlayerRecord};

/// Redraw interval while timers run
const TICK_MS: u64 = 100;

#[derive(Parser)]
#[command(name = "squid-slot", about = "Squid Story slot machine", version)]
struct Cli {
    /// Game config (JSON or YAML); the built-in game when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play {
        /// Name to submit to the leaderboard on quit
        #[arg(short, long)]
        name: Option<String>,
        /// Automatic reel stops and shorter pauses
        #[arg(short, long)]
        turbo: bool,
        /// Leaderboard file
        #[arg(long)]
        leaderboard: Option<PathBuf>,
    },
    /// Run a seeded RTP simulation
    Simulate {
        /// Number of rounds
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spins: u64,
        /// Bet per round (0 = base bet)
        #[arg(short, long, default_value_t = 0)]
        bet: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the payout table
    Paytable,
    /// Show the best scores
    Leaderboard {
        /// Entries to show
        #[arg(short, long, default_value_t = 10)]
        top: usize,
        /// Leaderboard file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Play {
        name: None,
        turbo: false,
        leaderboard: None,
    }) {
        Commands::Play {
            name,
            turbo,
            leaderboard,
        } => {
            let config = if turbo {
                GameConfig {
                    timing: TimingConfig::turbo(),
                    ..config
                }
            } else {
                config
            };
            let board = leaderboard.unwrap_or_else(FileLeaderboard::default_path);
            play(build_rules(config)?, cli.seed, name.as_deref(), &board)
        }
        Commands::Simulate { spins, bet, json } => {
            let rules = build_rules(config)?;
            let seed = cli.seed.unwrap_or(0);
            let report = Simulator::new(rules, seed)
                .run(spins, bet)
                .context("simulation failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_report(&report));
            }
            Ok(())
        }
        Commands::Paytable => {
            let rules = build_rules(config)?;
            print!(
                "{}",
                render::render_paytable(rules.catalog(), rules.bets().base_bet())
            );
            Ok(())
        }
        Commands::Leaderboard { top, file } => {
            let path = file.unwrap_or_else(FileLeaderboard::default_path);
            let board = FileLeaderboard::open(&path)
                .with_context(|| format!("opening leaderboard {}", path.display()))?;
            print!("{}", render::render_leaderboard(&board.top(top)?));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading game config {}", path.display())),
        None => Ok(GameConfig::standard()),
    }
}

fn build_rules(config: GameConfig) -> Result<Arc<SlotRules>> {
    SlotRules::new(config).context("invalid game config")
}

// ═══════════════════════════════════════════════════════════════════════════
// PLAY
// ═══════════════════════════════════════════════════════════════════════════

fn play(rules: Arc<SlotRules>, seed: Option<u64>, name: Option<&str>, board: &Path) -> Result<()> {
    let mut session = match seed {
        Some(seed) => SlotSession::with_seed(rules.clone(), seed),
        None => SlotSession::new(rules.clone()),
    };
    let mut record = PlayerRecord::load();
    let milestones = rules.config().milestones.clone();

    println!(
        "{}: Enter spins or stops a reel, s stops all, +/- changes the bet, q quits",
        rules.config().name
    );
    if record.high_score > 0 {
        println!("High score: {}", record.high_score);
    }

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("{}> ", render::render_view(&session.view(), rules.catalog()));
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        match input.trim() {
            "q" | "quit" => break,
            "+" | "-" => {
                let direction = if input.trim() == "+" {
                    BetDirection::Up
                } else {
                    BetDirection::Down
                };
                if !session.change_bet(direction) {
                    println!("Bet stays at {}", session.effective_bet());
                }
            }
            "s" | "stop" => session.stop_all_reels(),
            "" => match session.phase() {
                RoundPhase::Idle => {
                    if !session.spin() {
                        println!("Cannot spin right now");
                    }
                }
                RoundPhase::Spinning => {
                    session.stop_next_reel();
                }
                RoundPhase::Resolving | RoundPhase::GameOver => {}
            },
            other => println!("Unknown command: {other}"),
        }

        report_events(&mut session, &mut record, &milestones);
        run_timers(&mut session, &mut record, &milestones, rules.catalog());
    }

    let stats = session.stats();
    println!(
        "Played {} rounds, RTP {:.1}%, biggest win {}",
        stats.total_spins,
        stats.rtp(),
        stats.biggest_win
    );

    if let Some(name) = name {
        submit_score(board, name, record.high_score);
    }
    Ok(())
}

/// Let timed transitions play out, redrawing as they fire
fn run_timers(
    session: &mut SlotSession,
    record: &mut PlayerRecord,
    milestones: &[u64],
    catalog: &SymbolCatalog,
) {
    let auto_stop = session.rules().timing().auto_stop;
    loop {
        let waiting = match session.phase() {
            RoundPhase::Idle => false,
            RoundPhase::Spinning => auto_stop,
            RoundPhase::Resolving | RoundPhase::GameOver => true,
        };
        if !waiting {
            break;
        }

        thread::sleep(Duration::from_millis(TICK_MS));
        session.advance(TICK_MS as f64);
        if report_events(session, record, milestones) {
            print!("{}", render::render_view(&session.view(), catalog));
        }
    }
}

/// Print events and persist record changes; true if anything was shown
fn report_events(session: &mut SlotSession, record: &mut PlayerRecord, milestones: &[u64]) -> bool {
    let mut shown = false;
    for event in session.drain_events() {
        log::debug!("event: {}", event.name());
        shown |= matches!(event, SessionEvent::ReelStopped { .. });

        if let SessionEvent::RoundResolved { credits, .. } = &event {
            let update = record.observe_credits(*credits, milestones);
            if let Some(score) = update.new_high_score {
                println!("New high score: {score}");
            }
            for milestone in &update.new_milestones {
                println!("Milestone reached: {milestone} credits");
            }
            if update.is_changed() {
                if let Err(e) = record.save() {
                    log::warn!("Could not save player record: {e}");
                }
            }
        }

        if let Some(text) = render::describe_event(&event) {
            println!("{text}");
            shown = true;
        }
    }
    shown
}

fn submit_score(board: &Path, name: &str, score: u64) {
    let result = FileLeaderboard::open(board).and_then(|b| b.submit(name, score as f64));
    match result {
        Ok(entry) => println!("Submitted {} for {}", entry.score, entry.name),
        Err(e) => {
            log::warn!("Leaderboard submit failed: {e}");
            println!("Leaderboard unavailable");
        }
    }
}
