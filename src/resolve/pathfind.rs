//! Convoy routes through space and time.
//!
//! An army in a coastal province can be carried along a chain of fleets in
//! sea provinces. Each step may cross to a bordering location, to an adjacent
//! season, or both. The route ends when a coast of the destination province
//! borders the chain in the destination season.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::board::{Location, SeasonId, Terrain, Unit, World};

/// True if fleets standing anywhere in the multiverse could carry `unit` to
/// `dest` in `season`. Ownership and orders of the fleets do not matter.
pub fn convoy_path_exists(world: &World, unit: &Unit, dest: Location, season: SeasonId) -> bool {
    convoy_search(world, unit, dest, season, |_| true)
}

/// Breadth-first search over fleet-occupied sea locations. `carries` decides
/// which fleets may be part of the chain.
pub(crate) fn convoy_search(
    world: &World,
    unit: &Unit,
    dest: Location,
    season: SeasonId,
    mut carries: impl FnMut(&Unit) -> bool,
) -> bool {
    if !unit.location.is_land() || !dest.is_land() {
        return false;
    }
    let map = world.map();
    let origin_coasts: Vec<Location> = map
        .locations(unit.province())
        .iter()
        .copied()
        .filter(|l| l.is_water())
        .collect();
    let dest_coasts: Vec<Location> = map
        .locations(dest.province)
        .iter()
        .copied()
        .filter(|l| l.is_water())
        .collect();
    if origin_coasts.is_empty() || dest_coasts.is_empty() {
        return false;
    }

    let fleets: HashMap<(Location, SeasonId), &Unit> = world
        .units()
        .iter()
        .filter(|u| u.is_fleet())
        .map(|u| ((u.location, u.season), u))
        .collect();

    let mut queue: VecDeque<(Location, SeasonId)> =
        origin_coasts.into_iter().map(|l| (l, unit.season)).collect();
    let mut visited: HashSet<(Location, SeasonId)> = queue.iter().copied().collect();

    while let Some((location, at)) = queue.pop_front() {
        let seasons = if world.options().time_travel {
            world.seasons().adjacent_seasons(at)
        } else {
            Vec::new()
        };
        let borders = location.borders();
        let steps = borders
            .iter()
            .map(|&l| (l, at))
            .chain(seasons.iter().map(|&s| (location, s)))
            .chain(borders.iter().flat_map(|&l| seasons.iter().map(move |&s| (l, s))));

        for point in steps {
            if point.1 == season && dest_coasts.contains(&point.0) {
                return true;
            }
            if point.0.province.terrain() != Terrain::Sea || visited.contains(&point) {
                continue;
            }
            if let Some(fleet) = fleets.get(&point) {
                if carries(fleet) {
                    visited.insert(point);
                    queue.push_back(point);
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Province, Seasons};

    fn path(world: &World, army: &str, coord: (u32, u32), to: &str, dest: (u32, u32)) -> bool {
        let unit = world.unit_by_name(army, coord).unwrap();
        let dest_loc = world.map().land(to).unwrap();
        let season = world.season(dest.0, dest.1).unwrap();
        convoy_path_exists(world, unit, dest_loc, season)
    }

    #[test]
    fn single_fleet_carries_across_the_north_sea() {
        let world = World::empty().with_units(&["England A Lon", "England F Nth"]).unwrap();
        assert!(path(&world, "lon", (0, 0), "nwy", (0, 0)));
        assert!(!path(&world, "lon", (0, 0), "tun", (0, 0)));
    }

    #[test]
    fn chain_of_fleets() {
        let world = World::empty()
            .with_units(&["Italy A Tun", "Italy F Tys", "Italy F Lyo", "France F Wes"])
            .unwrap();
        assert!(path(&world, "tun", (0, 0), "mar", (0, 0)));
        assert!(path(&world, "tun", (0, 0), "spa", (0, 0)));
        assert!(!path(&world, "tun", (0, 0), "bre", (0, 0)));
    }

    #[test]
    fn coastal_fleets_and_inland_ends_break_the_chain() {
        let world = World::empty().with_units(&["England A Wal", "England F Lon"]).unwrap();
        assert!(!path(&world, "wal", (0, 0), "yor", (0, 0)));
        let world = World::empty().with_units(&["England A Lon", "England F Nth"]).unwrap();
        let unit = world.unit_by_name("lon", (0, 0)).unwrap();
        let root = world.seasons().root();
        assert!(!convoy_path_exists(&world, unit, Location::land(Province::Ruh), root));
    }

    #[test]
    fn fleets_in_the_past_carry_into_the_past() {
        let mut seasons = Seasons::new();
        let s0 = seasons.root();
        seasons.advance(s0);
        let world = World::empty().with_units(&["England F Nth"]).unwrap();
        let world = world.successor(seasons, world.units().to_vec(), Vec::new(), Default::default());
        let s1 = world.season(1, 0).unwrap();
        let world = world.with_units_at(s1, &["England A Lon"]).unwrap();
        assert!(path(&world, "lon", (1, 0), "nwy", (0, 0)));
        assert!(path(&world, "lon", (1, 0), "nwy", (1, 0)));
    }

    #[test]
    fn carrier_filter_is_respected() {
        let world = World::empty().with_units(&["England A Lon", "England F Nth"]).unwrap();
        let unit = world.unit_by_name("lon", (0, 0)).unwrap();
        let nwy = Location::land(Province::Nwy);
        let root = world.seasons().root();
        assert!(!convoy_search(&world, unit, nwy, root, |_| false));
        assert!(convoy_search(&world, unit, nwy, root, |f| f.province() == Province::Nth));
    }
}
