//! Chronopolitik, a multiversal Diplomacy adjudicator.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to see them.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use chronopolitik::engine::Engine;
use chronopolitik::protocol::parser::{parse_command, Command};

/// Runs the command loop until `quit` or end of input.
fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => {
                if !engine.set_option(&name, value.as_deref()) {
                    writeln!(out, "error unknown option or value '{name}'")?;
                    out.flush()?;
                }
            }
            Command::NewGame => engine.new_game(),
            Command::Order { text } => match engine.queue_order(&text) {
                Ok(order) => writeln!(out, "queued {}", engine.describe(&order))?,
                Err(e) => writeln!(out, "error {e}")?,
            },
            Command::ClearOrders => engine.queued.clear(),
            Command::Adjudicate => engine.handle_adjudicate(&mut out)?,
            Command::Units { season } => engine.handle_units(&mut out, season)?,
            Command::Seasons => engine.handle_seasons(&mut out)?,
            Command::Report => engine.handle_report(&mut out)?,
            Command::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}
