//! Chronopolitik engine library.
//!
//! Adjudicates Diplomacy across branching timelines: orders may reach into
//! the past and into neighbouring timelines, and a past battle whose outcome
//! changes forks a new timeline. Exposes the board model, the resolver,
//! order generation, and protocol modules for use by integration tests and
//! the binaries.

pub mod board;
pub mod engine;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod soak;
