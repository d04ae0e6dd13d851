//! Interactive session state.
//!
//! Holds the current world and the orders queued for the next phase, and
//! renders the answers to each command.

use std::io::{self, Write};

use crate::board::{GameOptions, Order, World};
use crate::protocol::notation::{format_order, parse_order, NotationError};
use crate::protocol::report::{AdjudicationReport, OrderReport};
use crate::resolve::run_phase;

/// Holds the mutable state of the session between commands.
pub struct Engine {
    pub world: World,
    pub queued: Vec<Order>,
    last_report: Option<AdjudicationReport>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a session at the standard opening.
    pub fn new() -> Self {
        Engine { world: World::standard(), queued: Vec::new(), last_report: None }
    }

    /// Starts over from the standard opening, keeping the options.
    pub fn new_game(&mut self) {
        let options = self.world.options().clone();
        self.world = World::standard().with_options(options);
        self.queued.clear();
        self.last_report = None;
    }

    /// Applies `setoption`. Returns false for unknown names or bad values.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> bool {
        let mut options: GameOptions = self.world.options().clone();
        if !options.set(name, value.unwrap_or("true")) {
            return false;
        }
        self.world = self.world.clone().with_options(options);
        true
    }

    /// Parses an order against the current world and queues it.
    pub fn queue_order(&mut self, text: &str) -> Result<Order, NotationError> {
        let order = parse_order(&self.world, text)?;
        self.queued.push(order);
        Ok(order)
    }

    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Plays the queued orders. Writes one `result` line per order, one
    /// `season` line per created season, then `adjudicated`.
    pub fn handle_adjudicate<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let orders = std::mem::take(&mut self.queued);
        let phase = match run_phase(&self.world, &orders) {
            Ok(phase) => phase,
            Err(e) => {
                tracing::error!(error = %e, "adjudication failed");
                writeln!(out, "error {e}")?;
                return out.flush();
            }
        };

        let report = AdjudicationReport::new(&self.world, &phase);
        for line in &report.orders {
            writeln!(out, "result {}", result_line(line))?;
        }
        let before = self.world.seasons().len();
        for season in phase.world.seasons().iter().skip(before) {
            match season.past {
                Some(past) => writeln!(out, "season {season} from {}", phase.world.season_info(past))?,
                None => writeln!(out, "season {season}")?,
            }
        }
        writeln!(out, "adjudicated")?;

        self.world = phase.world;
        self.last_report = Some(report);
        out.flush()
    }

    /// Lists units, one per line, optionally restricted to one season.
    pub fn handle_units<W: Write>(&self, out: &mut W, season: Option<(u32, u32)>) -> io::Result<()> {
        let filter = match season {
            Some((turn, timeline)) => match self.world.season(turn, timeline) {
                Ok(id) => Some(id),
                Err(e) => {
                    writeln!(out, "error {e}")?;
                    return out.flush();
                }
            },
            None => None,
        };
        for unit in self.world.units().iter().filter(|u| filter.map_or(true, |s| u.season == s)) {
            let head = if self.world.is_orderable(unit.id) { "" } else { " past" };
            writeln!(out, "unit {unit}@{}{head}", self.world.season_info(unit.season))?;
        }
        for retreat in self.world.retreats() {
            let unit = self.world.unit(retreat.unit);
            writeln!(
                out,
                "retreat {unit}@{} {}",
                self.world.season_info(unit.season),
                retreat.destinations.len()
            )?;
        }
        out.flush()
    }

    /// Lists every season with its past, marking timeline heads.
    pub fn handle_seasons<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for season in self.world.seasons().iter() {
            let past = season.past.map(|p| self.world.season_info(p).to_string());
            let head = if season.is_head() { " head" } else { "" };
            writeln!(out, "season {season} from {}{head}", past.as_deref().unwrap_or("-"))?;
        }
        out.flush()
    }

    pub fn handle_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.last_report {
            Some(report) => match report.to_json() {
                Ok(json) => writeln!(out, "{json}")?,
                Err(e) => writeln!(out, "error {e}")?,
            },
            None => writeln!(out, "error nothing adjudicated yet")?,
        }
        out.flush()
    }

    /// Formats a queued order back into notation.
    pub fn describe(&self, order: &Order) -> String {
        format_order(&self.world, order)
    }
}

fn result_line(line: &OrderReport) -> String {
    let mut text = format!("{} : {}", line.order, line.reason);
    if line.implicit {
        text.push_str(" implicit");
    }
    match line.moved {
        Some(true) => text.push_str(" moves"),
        Some(false) => text.push_str(" bounces"),
        None => {}
    }
    if line.supported == Some(false) {
        text.push_str(" cut");
    }
    if line.dislodged == Some(true) {
        text.push_str(" dislodged");
    }
    text
}
