//! Text protocol handling.
//!
//! Order notation, the command parser for the main loop, and the JSON
//! adjudication report.

pub mod notation;
pub mod parser;
pub mod report;

pub use notation::{format_order, parse_order, parse_orders, parse_season, NotationError};
pub use parser::{parse_command, Command};
pub use report::{AdjudicationReport, OrderReport};
