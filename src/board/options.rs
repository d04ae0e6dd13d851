//! Game options carried by every world snapshot.

use serde::{Deserialize, Serialize};

/// Default recursion limit for resolving one decision's dependencies.
pub const DEFAULT_MAX_DECISION_DEPTH: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// When false, orders may only target the ordered unit's own season.
    pub time_travel: bool,
    /// Recursion limit for the resolver; exceeding it is an engine error.
    pub max_decision_depth: usize,
    /// Give every unordered head unit an implicit hold during validation.
    pub implicit_holds: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            time_travel: true,
            max_decision_depth: DEFAULT_MAX_DECISION_DEPTH,
            implicit_holds: true,
        }
    }
}

impl GameOptions {
    pub fn from_json(text: &str) -> Result<GameOptions, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Applies a `setoption`-style change. Returns false for unknown names or
    /// unparsable values.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "timetravel" | "time_travel" => match parse_bool(value) {
                Some(b) => self.time_travel = b,
                None => return false,
            },
            "maxdecisiondepth" | "max_decision_depth" => match value.trim().parse() {
                Ok(n) => self.max_decision_depth = n,
                Err(_) => return false,
            },
            "implicitholds" | "implicit_holds" => match parse_bool(value) {
                Some(b) => self.implicit_holds = b,
                None => return false,
            },
            _ => return false,
        }
        true
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}
