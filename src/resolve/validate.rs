//! Order validation for the movement phase.
//!
//! Illegal orders are never errors: each submitted order comes back with a
//! verdict and a reason. Checks run in a fixed sequence and each stage only
//! sees the survivors of the stages before it, so a unit that was given one
//! legal and one illegal order keeps the legal one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Location, Order, OrderKind, SeasonId, Unit, World};

use super::pathfind::convoy_path_exists;

/// Why an order was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationReason {
    Valid,
    InvalidOrderTypeForPhase,
    InvalidUnitForPower,
    IneligibleForOrder,
    IllegalDestinationType,
    DestinationMatchesOrigin,
    UnreachableDestination,
    InvalidOrderTypeForUnit,
    NoSelfSupport,
    UnreachableSupport,
    NoSupportMoveAgainstSelf,
    DuplicateOrders,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Verdict on one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderValidation {
    pub order: Order,
    pub valid: bool,
    pub reason: ValidationReason,
    /// Set on holds synthesized for units that had no valid order.
    pub implicit: bool,
}

impl OrderValidation {
    fn accept(order: Order) -> Self {
        OrderValidation { order, valid: true, reason: ValidationReason::Valid, implicit: false }
    }

    fn reject(order: Order, reason: ValidationReason) -> Self {
        OrderValidation { order, valid: false, reason, implicit: false }
    }
}

/// Order kinds accepted in the movement phase.
const MOVEMENT_ORDERS: [OrderKind; 5] = [
    OrderKind::Hold,
    OrderKind::Move,
    OrderKind::Convoy,
    OrderKind::SupportHold,
    OrderKind::SupportMove,
];

/// Validates one phase's combined orders from every power.
///
/// The result holds one entry per submitted order, in submission order,
/// followed by an implicit hold for every orderable unit left without a valid
/// order.
pub fn validate_orders(world: &World, orders: &[Order]) -> Vec<OrderValidation> {
    let mut verdicts: Vec<Option<ValidationReason>> = orders
        .iter()
        .map(|order| check_order(world, order).err())
        .collect();

    // Duplicates are counted among survivors only.
    let mut counts = std::collections::HashMap::new();
    for (order, verdict) in orders.iter().zip(&verdicts) {
        if let (None, Some(unit)) = (verdict, order.unit()) {
            *counts.entry(unit).or_insert(0usize) += 1;
        }
    }
    for (order, verdict) in orders.iter().zip(verdicts.iter_mut()) {
        if verdict.is_none() && order.unit().is_some_and(|u| counts[&u] > 1) {
            *verdict = Some(ValidationReason::DuplicateOrders);
        }
    }

    let mut results: Vec<OrderValidation> = orders
        .iter()
        .zip(&verdicts)
        .map(|(order, verdict)| match verdict {
            None => OrderValidation::accept(*order),
            Some(reason) => OrderValidation::reject(*order, *reason),
        })
        .collect();

    let rejected = results.iter().filter(|r| !r.valid).count();
    let mut implicit = 0;
    if world.options().implicit_holds {
        let ordered: std::collections::HashSet<_> =
            results.iter().filter(|r| r.valid).filter_map(|r| r.order.unit()).collect();
        for unit in world.orderable_units() {
            if !ordered.contains(&unit.id) {
                let hold = Order::Hold { power: unit.power, unit: unit.id };
                results.push(OrderValidation { implicit: true, ..OrderValidation::accept(hold) });
                implicit += 1;
            }
        }
    }

    tracing::debug!(submitted = orders.len(), rejected, implicit, "validated orders");
    results
}

/// The valid orders of a validation, ready for adjudication.
pub fn valid_orders(validations: &[OrderValidation]) -> Vec<Order> {
    validations.iter().filter(|v| v.valid).map(|v| v.order).collect()
}

fn check_order(world: &World, order: &Order) -> Result<(), ValidationReason> {
    use ValidationReason::*;

    if !MOVEMENT_ORDERS.contains(&order.kind()) {
        return Err(InvalidOrderTypeForPhase);
    }
    // Every movement-phase order names a unit.
    let Some(id) = order.unit() else {
        return Err(InvalidOrderTypeForPhase);
    };
    let unit = world.unit(id);
    if unit.power != order.power() {
        return Err(InvalidUnitForPower);
    }
    if !world.is_orderable(id) {
        return Err(IneligibleForOrder);
    }

    match *order {
        Order::Hold { .. } => Ok(()),
        Order::Move { dest, season, .. } => check_move(world, unit, dest, season),
        Order::Convoy { target, dest, season, .. } => {
            let target = world.unit(target);
            if !unit.is_fleet() || !target.is_army() {
                return Err(InvalidOrderTypeForUnit);
            }
            if !dest.is_land() || !world.map().is_coastal(dest.province) {
                return Err(IllegalDestinationType);
            }
            if dest == target.location && season == target.season {
                return Err(DestinationMatchesOrigin);
            }
            if !world.options().time_travel && season != target.season {
                return Err(UnreachableDestination);
            }
            if !convoy_path_exists(world, target, dest, season) {
                return Err(UnreachableDestination);
            }
            Ok(())
        }
        Order::SupportHold { target, .. } => {
            if target == id {
                return Err(NoSelfSupport);
            }
            let target = world.unit(target);
            if !can_support(world, unit, target.location, target.season) {
                return Err(UnreachableSupport);
            }
            Ok(())
        }
        Order::SupportMove { target, dest, season, .. } => {
            if target == id {
                return Err(NoSelfSupport);
            }
            if dest.province == unit.province() {
                return Err(NoSupportMoveAgainstSelf);
            }
            if !can_support(world, unit, dest, season) {
                return Err(UnreachableSupport);
            }
            Ok(())
        }
        Order::Disband { .. } | Order::Retreat { .. } | Order::Build { .. } | Order::Sustain { .. } => {
            Err(InvalidOrderTypeForPhase)
        }
    }
}

fn check_move(
    world: &World,
    unit: &Unit,
    dest: Location,
    season: SeasonId,
) -> Result<(), ValidationReason> {
    use ValidationReason::*;

    if dest.kind != unit.unit_type.terrain() {
        return Err(IllegalDestinationType);
    }
    if dest == unit.location && season == unit.season {
        return Err(DestinationMatchesOrigin);
    }
    if !world.options().time_travel && season != unit.season {
        return Err(UnreachableDestination);
    }
    if unit.location.borders_with(dest) && world.seasons().is_adjacent(unit.season, season) {
        return Ok(());
    }
    // Anything farther needs a convoy, which only armies can use.
    if unit.is_fleet() || !convoy_path_exists(world, unit, dest, season) {
        return Err(UnreachableDestination);
    }
    Ok(())
}

/// A supporter must be able to move into the province, though not
/// necessarily the exact location, in the supported season.
fn can_support(world: &World, unit: &Unit, dest: Location, season: SeasonId) -> bool {
    unit.location.borders_province(dest.province) && season_reachable(world, unit.season, season)
}

/// Turn- and timeline-adjacent, and the unit's own season when time travel
/// is off.
pub(crate) fn season_reachable(world: &World, from: SeasonId, to: SeasonId) -> bool {
    if !world.options().time_travel {
        return from == to;
    }
    world.seasons().is_adjacent(from, to)
}
