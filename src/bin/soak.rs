//! Random-game soak runner CLI.
//!
//! Plays random multiversal games, checks every phase, and outputs one JSON
//! line per game.
//!
//! Usage:
//!   cargo run --release --bin soak -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --turns N       Movement phases per game (default: 8)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use chronopolitik::soak::{self, SoakConfig};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut config = SoakConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).map(String::as_str);
        let parsed = match args[i].as_str() {
            "--games" => value.and_then(|v| v.parse().ok()).map(|n| config.games = n),
            "--turns" => value.and_then(|v| v.parse().ok()).map(|n| config.turns = n),
            "--threads" => value.and_then(|v| v.parse().ok()).map(|n| config.threads = n),
            "--seed" => value.and_then(|v| v.parse().ok()).map(|n| config.seed = n),
            "--output" => value.map(|v| output_path = Some(v.to_string())),
            "--quiet" => {
                config.quiet = true;
                i += 1;
                continue;
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                return ExitCode::FAILURE;
            }
        };
        if parsed.is_none() {
            eprintln!("invalid or missing value for {}", args[i]);
            return ExitCode::FAILURE;
        }
        i += 2;
    }

    let default_level = if config.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!(
        games = config.games,
        turns = config.turns,
        threads = config.threads,
        seed = config.seed,
        "starting soak"
    );

    let start = Instant::now();
    let games = match soak::run_soak(&config) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let failures = games.iter().filter(|g| g.failure.is_some()).count();
    tracing::info!(
        games = games.len(),
        failures,
        secs = start.elapsed().as_secs_f64(),
        "soak finished"
    );

    let written = match output_path {
        Some(path) => File::create(&path)
            .map_err(soak::SoakError::from)
            .and_then(|file| soak::write_jsonl(&games, &mut BufWriter::new(file))),
        None => soak::write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        eprintln!("failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_usage() {
    eprintln!("Usage: soak [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --turns N        Movement phases per game (default: 8)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress output");
    eprintln!("  --help           Show this help");
}
