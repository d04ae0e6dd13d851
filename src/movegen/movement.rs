//! Movement-phase order generation.
//!
//! Enumerates hold, move, support, and convoy orders for one unit. Every
//! order produced here passes validation.

use crate::board::{Location, Order, SeasonId, Terrain, Unit, UnitId, World, ALL_PROVINCES};
use crate::resolve::convoy_path_exists;
use crate::resolve::validate::season_reachable;

/// Seasons a unit in `season` may act on in one step.
fn reachable_seasons(world: &World, season: SeasonId) -> Vec<SeasonId> {
    let mut seasons = vec![season];
    if world.options().time_travel {
        seasons.extend(world.seasons().adjacent_seasons(season));
    }
    seasons
}

/// Every direct move target of `unit`: bordering locations in reachable seasons.
fn move_targets(world: &World, unit: &Unit) -> Vec<(Location, SeasonId)> {
    let seasons = reachable_seasons(world, unit.season);
    unit.location
        .borders()
        .iter()
        .flat_map(|&l| seasons.iter().map(move |&s| (l, s)))
        .collect()
}

/// Generates all legal movement-phase orders for `id`.
///
/// Returns an empty vec for units that cannot be ordered this phase.
pub fn legal_orders(world: &World, id: UnitId) -> Vec<Order> {
    if !world.is_orderable(id) {
        return Vec::new();
    }
    let unit = world.unit(id);
    let power = unit.power;

    let mut orders = vec![Order::Hold { power, unit: id }];

    orders.extend(
        move_targets(world, unit)
            .into_iter()
            .map(|(dest, season)| Order::Move { power, unit: id, dest, season }),
    );

    generate_supports(world, unit, &mut orders);

    // Fleets at sea can carry armies.
    if unit.is_fleet() && unit.province().terrain() == Terrain::Sea {
        generate_convoys(world, unit, &mut orders);
    }

    orders
}

/// Support orders for every other unit standing in a reachable season.
fn generate_supports(world: &World, unit: &Unit, orders: &mut Vec<Order>) {
    let power = unit.power;
    for season in reachable_seasons(world, unit.season) {
        for other in world.units_in(season).filter(|o| o.id != unit.id) {
            if unit.location.borders_province(other.province()) {
                orders.push(Order::SupportHold { power, unit: unit.id, target: other.id });
            }
            for (dest, dest_season) in move_targets(world, other) {
                if dest.province != unit.province()
                    && unit.location.borders_province(dest.province)
                    && season_reachable(world, unit.season, dest_season)
                {
                    orders.push(Order::SupportMove {
                        power,
                        unit: unit.id,
                        target: other.id,
                        dest,
                        season: dest_season,
                    });
                }
            }
        }
    }
}

/// Convoys for armies on the fleet's own shores, in reachable seasons, to
/// any coastal province of the army's season a fleet chain can reach.
fn generate_convoys(world: &World, fleet: &Unit, orders: &mut Vec<Order>) {
    let map = world.map();
    let coasts: Vec<Location> = ALL_PROVINCES
        .iter()
        .filter(|&&p| map.is_coastal(p))
        .map(|&p| Location::land(p))
        .collect();

    for season in reachable_seasons(world, fleet.season) {
        let armies = world
            .units_in(season)
            .filter(|u| u.is_army() && fleet.location.borders_province(u.province()));
        for army in armies {
            for &dest in coasts.iter().filter(|d| d.province != army.province()) {
                if convoy_path_exists(world, army, dest, army.season) {
                    orders.push(Order::Convoy {
                        power: fleet.power,
                        unit: fleet.id,
                        target: army.id,
                        dest,
                        season: army.season,
                    });
                }
            }
        }
    }
}
