//! Trace sinks for the resolver.
//!
//! The resolver reports every step it takes as an indented line. Sinks only
//! observe; nothing they do can change an outcome.

use std::fmt;

/// Receives one trace line per resolver step. `depth` is the recursion depth
/// of the decision being worked on.
pub trait DecisionLog {
    fn log(&mut self, depth: usize, message: fmt::Arguments<'_>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl DecisionLog for NullLog {
    fn log(&mut self, _depth: usize, _message: fmt::Arguments<'_>) {}
}

/// Forwards lines to `tracing` at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl DecisionLog for TracingLog {
    fn log(&mut self, depth: usize, message: fmt::Arguments<'_>) {
        tracing::trace!(
            target: "chronopolitik::resolve",
            "{:indent$}{}",
            "",
            message,
            indent = depth * 2
        );
    }
}

/// Keeps lines in memory, indented two spaces per level.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

impl DecisionLog for MemoryLog {
    fn log(&mut self, depth: usize, message: fmt::Arguments<'_>) {
        self.lines.push(format!("{:indent$}{}", "", message, indent = depth * 2));
    }
}
