//! Decision values and resolver failures.
//!
//! A binary decision starts undecided and may be set once. A numeric decision
//! is a range that starts at `[0, 99]` and may only narrow; it is decided
//! when both ends meet. Any attempt to go back on a decision is an engine
//! fault, never a property of the orders.

use std::fmt;

use thiserror::Error;

/// Upper bound of every numeric decision before it is narrowed.
pub const MAX_STRENGTH: u8 = 99;

/// Faults inside the adjudicator. Validated orders never cause these; each
/// one is a logic defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cannot reverse a decision from {from} to {to}")]
    Reversal { from: bool, to: bool },
    #[error("cannot widen a decision from {from:?} to {to:?}")]
    Widening { from: (u8, u8), to: (u8, u8) },
    #[error("{count} decisions left unresolved, first {first}")]
    Unresolved { count: usize, first: String },
    #[error("decision depth limit {limit} exceeded at {decision}")]
    TooDeep { limit: usize, decision: String },
    #[error("no decision {0}")]
    MissingDecision(String),
    #[error("{decision}: {source}")]
    InDecision {
        decision: String,
        #[source]
        source: Box<EngineError>,
    },
}

/// Tri-state outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Binary(Option<bool>);

impl Binary {
    pub fn outcome(self) -> Option<bool> {
        self.0
    }

    pub fn is_resolved(self) -> bool {
        self.0.is_some()
    }

    /// Sets the outcome. Returns whether anything changed.
    pub fn update(&mut self, outcome: bool) -> Result<bool, EngineError> {
        match self.0 {
            None => {
                self.0 = Some(outcome);
                Ok(true)
            }
            Some(current) if current == outcome => Ok(false),
            Some(current) => Err(EngineError::Reversal { from: current, to: outcome }),
        }
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("?"),
        }
    }
}

/// Closed integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeric {
    min: u8,
    max: u8,
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric { min: 0, max: MAX_STRENGTH }
    }
}

impl Numeric {
    pub fn min(self) -> u8 {
        self.min
    }

    pub fn max(self) -> u8 {
        self.max
    }

    pub fn range(self) -> (u8, u8) {
        (self.min, self.max)
    }

    pub fn is_resolved(self) -> bool {
        self.min == self.max
    }

    /// Narrows the range. Returns whether anything changed.
    pub fn update(&mut self, min: u8, max: u8) -> Result<bool, EngineError> {
        if min < self.min || max > self.max || min > max {
            return Err(EngineError::Widening { from: self.range(), to: (min, max) });
        }
        let changed = (min, max) != self.range();
        self.min = min;
        self.max = max;
        Ok(changed)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

/// The current value of one decision in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Binary(Binary),
    Numeric(Numeric),
}

impl Value {
    pub fn is_resolved(self) -> bool {
        match self {
            Value::Binary(b) => b.is_resolved(),
            Value::Numeric(n) => n.is_resolved(),
        }
    }

    pub fn outcome(self) -> Option<bool> {
        match self {
            Value::Binary(b) => b.outcome(),
            Value::Numeric(_) => None,
        }
    }

    pub fn strength(self) -> Option<Numeric> {
        match self {
            Value::Binary(_) => None,
            Value::Numeric(n) => Some(n),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Binary(b) => b.fmt(f),
            Value::Numeric(n) => n.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_is_set_once() {
        let mut b = Binary::default();
        assert!(!b.is_resolved());
        assert_eq!(b.update(true), Ok(true));
        assert_eq!(b.update(true), Ok(false));
        assert_eq!(b.update(false), Err(EngineError::Reversal { from: true, to: false }));
        assert_eq!(b.outcome(), Some(true));
    }

    #[test]
    fn numeric_only_narrows() {
        let mut n = Numeric::default();
        assert_eq!(n.range(), (0, MAX_STRENGTH));
        assert_eq!(n.update(1, 3), Ok(true));
        assert_eq!(n.update(1, 3), Ok(false));
        assert_eq!(n.update(0, 3), Err(EngineError::Widening { from: (1, 3), to: (0, 3) }));
        assert_eq!(n.update(1, 4), Err(EngineError::Widening { from: (1, 3), to: (1, 4) }));
        assert_eq!(n.update(2, 2), Ok(true));
        assert!(n.is_resolved());
        assert_eq!(n.to_string(), "[2,2]");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut n = Numeric::default();
        assert!(n.update(3, 2).is_err());
        assert_eq!(n.range(), (0, MAX_STRENGTH));
    }
}
