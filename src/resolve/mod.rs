//! Order resolution.
//!
//! One movement phase runs in three steps: [`validate_orders`] screens the
//! submitted orders, [`adjudicate_orders`] resolves the survivors together
//! with every order of the seasons they reach, and [`update_world`] turns the
//! outcome into the next snapshot. [`run_phase`] chains all three.

pub mod adjudicate;
pub mod decision;
pub mod graph;
pub mod log;
pub mod pathfind;
pub mod update;
pub mod validate;

pub use adjudicate::{adjudicate_orders, adjudicate_with_log, Adjudication};
pub use decision::{Binary, EngineError, Numeric, Value, MAX_STRENGTH};
pub use graph::{Decision, DecisionGraph, DecisionKey};
pub use log::{DecisionLog, MemoryLog, NullLog, TracingLog};
pub use pathfind::convoy_path_exists;
pub use update::update_world;
pub use validate::{valid_orders, validate_orders, OrderValidation, ValidationReason};

use crate::board::{Order, World};

/// Everything one movement phase produced.
#[derive(Debug, Clone)]
pub struct Phase {
    pub validations: Vec<OrderValidation>,
    pub adjudication: Adjudication,
    pub world: World,
}

/// Validates, adjudicates and applies `orders`.
pub fn run_phase(world: &World, orders: &[Order]) -> Result<Phase, EngineError> {
    let validations = validate_orders(world, orders);
    let adjudication = adjudicate_orders(world, &valid_orders(&validations))?;
    let world = update_world(world, &adjudication)?;
    Ok(Phase { validations, adjudication, world })
}
