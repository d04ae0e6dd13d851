//! Command parser for the interactive session.
//!
//! Parses incoming lines into structured `Command` variants that the main
//! loop dispatches on. Order text is kept raw; it can only be resolved
//! against the current world.

use super::notation::parse_season;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the session replies `readyok`.
    IsReady,

    /// `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start over from the standard opening.
    NewGame,

    /// Queue an order for the next adjudication.
    Order { text: String },

    /// Drop every queued order.
    ClearOrders,

    /// Validate, adjudicate and apply the queued orders.
    Adjudicate,

    /// List units, optionally of one season.
    Units { season: Option<(u32, u32)> },

    /// List every season.
    Seasons,

    /// Print the last adjudication as JSON.
    Report,

    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "adjudicate" => Some(Command::Adjudicate),
        "seasons" => Some(Command::Seasons),
        "report" => Some(Command::Report),
        "clearorders" => Some(Command::ClearOrders),

        "setoption" => parse_setoption(&tokens),
        "order" => parse_order_line(trimmed),
        "units" => parse_units(&tokens),

        other => {
            tracing::warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        tracing::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let name = tokens[2..vi].join(" ");
            if name.is_empty() {
                tracing::warn!("malformed setoption: empty name");
                return None;
            }
            let value = Some(tokens[vi + 1..].join(" ")).filter(|v| !v.is_empty());
            (name, value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `order <notation>`, keeping everything after the keyword.
fn parse_order_line(line: &str) -> Option<Command> {
    let text = line.strip_prefix("order").unwrap_or_default().trim();
    if text.is_empty() {
        tracing::warn!("malformed order: expected 'order <order>'");
        return None;
    }
    Some(Command::Order { text: text.to_string() })
}

/// Parses `units [<turn>:<timeline>]`.
fn parse_units(tokens: &[&str]) -> Option<Command> {
    match tokens.get(1) {
        None => Some(Command::Units { season: None }),
        Some(text) => match parse_season(text) {
            Ok(season) => Some(Command::Units { season: Some(season) }),
            Err(e) => {
                tracing::warn!(error = %e, "malformed units");
                None
            }
        },
    }
}
