//! Batch simulation CLI.
//!
//! Plays all-computer games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --games 1000 --seed 7 --output games.jsonl

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crossroads::board::{Board, ROLE_COUNT};
use crossroads::cards::CardLibrary;
use crossroads::game::GameConfig;
use crossroads::simulate::{self, SimulationConfig, SimulationError, Summary};

/// Plays all-computer Crossroads games and records the results as JSONL.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Computer players per game
    #[arg(long, default_value_t = ROLE_COUNT)]
    players: usize,

    /// Base random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of worker threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Round limit per game, 0 for none
    #[arg(long, default_value_t = crossroads::game::config::DEFAULT_MAX_ROUNDS)]
    max_rounds: u32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let config = SimulationConfig {
        games: args.games,
        players: args.players,
        seed: args.seed,
        threads: args.threads,
        game: GameConfig {
            max_rounds: (args.max_rounds > 0).then_some(args.max_rounds),
            ..GameConfig::default()
        },
    };

    if !args.quiet {
        eprintln!(
            "Simulating {} games, {} players, {} threads",
            config.games, config.players, config.threads
        );
    }

    let board = Arc::new(Board::standard()?);
    let cards = Arc::new(CardLibrary::standard()?);

    let start = Instant::now();
    let records = simulate::run_simulation(board, cards, &config)?;
    let elapsed = start.elapsed();

    if !args.quiet {
        eprintln!(
            "Completed {} games in {:.2}s",
            records.len(),
            elapsed.as_secs_f64()
        );
        eprint!("{}", Summary::from_records(&records));
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            simulate::write_jsonl(&records, &mut writer)?;
            if !args.quiet {
                eprintln!("Wrote {} games to {}", records.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&records, &mut writer)?;
        }
    }
    Ok(())
}
