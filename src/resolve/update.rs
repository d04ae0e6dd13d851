//! Applies an adjudication to produce the next world snapshot.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::{
    Location, Order, OrderHistory, Point, Province, RetreatingUnit, SeasonId, Unit, UnitId, World,
};

use super::adjudicate::Adjudication;
use super::decision::EngineError;
use super::graph::DecisionKey;

/// Builds the successor of `world` from a fully resolved adjudication.
///
/// Every season whose timeline advances gets one new season: a plain
/// continuation for a timeline head, a fork otherwise. Units that moved
/// follow their lineage into the destination's successor; units that stayed
/// and survived follow it in place. Dislodged units are listed as retreating
/// with the places they may go. The orders and outcomes of this phase replace
/// the history recorded for their seasons.
pub fn update_world(world: &World, adjudication: &Adjudication) -> Result<World, EngineError> {
    let graph = adjudication.graph();
    let outcome = |key: DecisionKey| {
        adjudication.outcome(key).ok_or_else(|| EngineError::MissingDecision(key.to_string()))
    };

    let mut seasons = world.seasons().clone();
    let mut successors: BTreeMap<SeasonId, SeasonId> = BTreeMap::new();
    for &season in graph.seasons() {
        if !outcome(DecisionKey::AdvanceTimeline(season))? {
            continue;
        }
        let next = if world.seasons().is_head(season) {
            let next = seasons.advance(season);
            tracing::debug!(from = %seasons.get(season), to = %seasons.get(next), "advanced timeline");
            next
        } else {
            let next = seasons.fork(season);
            tracing::debug!(from = %seasons.get(season), to = %seasons.get(next), "forked timeline");
            next
        };
        successors.insert(season, next);
    }

    let mut units = world.units().to_vec();
    let mut dislodged = Vec::new();
    let mut history: BTreeMap<SeasonId, OrderHistory> = world.all_history().clone();
    let mut targeted: BTreeSet<Point> = BTreeSet::new();
    let mut entered: BTreeSet<Point> = BTreeSet::new();

    for order in graph.orders() {
        let Some(id) = order.unit() else {
            continue;
        };
        let unit = *world.unit(id);
        let was_dislodged = outcome(DecisionKey::IsDislodged(id))?;
        let moved = match order.destination() {
            Some((dest, season)) if order.is_move() => {
                let moved = outcome(DecisionKey::DoesMove(id))?;
                let point = Point::new(dest.province, season);
                targeted.insert(point);
                if moved {
                    entered.insert(point);
                    // An arrival from another season already lives in the
                    // timeline it forked earlier.
                    let arrived_before = season != unit.season
                        && world.history(unit.season).is_some_and(|h| {
                            h.order_for(id) == Some(order) && h.did_move(id) == Some(true)
                        });
                    if let Some(&next) = successors.get(&season).filter(|_| !arrived_before) {
                        extend_lineage(&mut units, &unit, dest, next);
                    }
                }
                Some(moved)
            }
            _ => None,
        };

        if was_dislodged {
            dislodged.push(id);
        } else if moved != Some(true) {
            if let Some(&next) = successors.get(&unit.season) {
                extend_lineage(&mut units, &unit, unit.location, next);
            }
        }

        history.entry(unit.season).or_default().record(id, *order, was_dislodged, moved);
    }

    let standoffs: BTreeSet<Point> = targeted.difference(&entered).copied().collect();
    let retreats = dislodged
        .into_iter()
        .filter_map(|id| {
            let unit = world.unit(id);
            let next = *successors.get(&unit.season)?;
            let attacker = dislodger_origin(world, adjudication, unit);
            let destinations = unit
                .location
                .borders()
                .iter()
                .filter(|l| !units.iter().any(|u| u.season == next && u.province() == l.province))
                .filter(|l| !standoffs.contains(&Point::new(l.province, unit.season)))
                .filter(|l| Some(l.province) != attacker)
                .map(|&l| (l, next))
                .collect();
            Some(RetreatingUnit { unit: id, destinations })
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        created = successors.len(),
        units = units.len() - world.units().len(),
        retreats = retreats.len(),
        "updated world"
    );
    Ok(world.successor(seasons, units, retreats, history))
}

fn extend_lineage(units: &mut Vec<Unit>, from: &Unit, location: Location, season: SeasonId) {
    let id = UnitId(units.len() as u32);
    units.push(Unit { id, past: Some(from.id), location, season, ..*from });
}

/// The province a successful attacker on `unit` came from, when it attacked
/// from the same season.
fn dislodger_origin(world: &World, adjudication: &Adjudication, unit: &Unit) -> Option<Province> {
    adjudication.graph().orders().iter().find_map(|order| match *order {
        Order::Move { unit: attacker, dest, season, .. }
            if season == unit.season
                && dest.province == unit.province()
                && adjudication.does_move(attacker) == Some(true) =>
        {
            let from = world.unit(attacker);
            (from.season == unit.season).then_some(from.province())
        }
        _ => None,
    })
}
