//! Immutable world snapshots.
//!
//! A [`World`] holds the whole multiverse: every season, every unit of every
//! lineage, units awaiting retreat, and per-season order history. Operations
//! that change the game return a new snapshot and leave the old one intact.

use std::collections::BTreeMap;

use thiserror::Error;

use super::history::OrderHistory;
use super::map::{Location, Map, MapError};
use super::options::GameOptions;
use super::province::{Coast, Power, Province, ALL_POWERS};
use super::season::{Season, SeasonId, Seasons};
use super::unit::{Point, Unit, UnitId, UnitType};

/// Lookup failures when building or querying a world. These indicate a
/// malformed setup, not an illegal order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("unknown power '{0}'")]
    UnknownPower(String),
    #[error("no season {turn}:{timeline}")]
    UnknownSeason { turn: u32, timeline: u32 },
    #[error("no unit in {province} at {season}")]
    NoUnit { province: String, season: String },
    #[error("{province} at {season} is already occupied")]
    Occupied { province: String, season: String },
    #[error("malformed unit '{0}'; expected '<power> <A|F> <province> [coast]'")]
    BadUnitSpec(String),
}

/// A dislodged unit and the places it may retreat to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetreatingUnit {
    pub unit: UnitId,
    pub destinations: Vec<(Location, SeasonId)>,
}

#[derive(Debug, Clone)]
pub struct World {
    map: &'static Map,
    powers: Vec<Power>,
    seasons: Seasons,
    units: Vec<Unit>,
    retreats: Vec<RetreatingUnit>,
    history: BTreeMap<SeasonId, OrderHistory>,
    options: GameOptions,
}

/// Starting units of the standard game.
const STANDARD_UNITS: [(Power, UnitType, Location); 22] = {
    use Power::*;
    use Province::*;
    use UnitType::*;
    [
        (Austria, Army, Location::land(Bud)),
        (Austria, Army, Location::land(Vie)),
        (Austria, Fleet, Location::water(Tri)),
        (England, Army, Location::land(Lvp)),
        (England, Fleet, Location::water(Edi)),
        (England, Fleet, Location::water(Lon)),
        (France, Army, Location::land(Mar)),
        (France, Army, Location::land(Par)),
        (France, Fleet, Location::water(Bre)),
        (Germany, Army, Location::land(Ber)),
        (Germany, Army, Location::land(Mun)),
        (Germany, Fleet, Location::water(Kie)),
        (Italy, Army, Location::land(Rom)),
        (Italy, Army, Location::land(Ven)),
        (Italy, Fleet, Location::water(Nap)),
        (Russia, Army, Location::land(Mos)),
        (Russia, Army, Location::land(War)),
        (Russia, Fleet, Location::water(Sev)),
        (Russia, Fleet, Location::coast(Stp, Coast::South)),
        (Turkey, Army, Location::land(Con)),
        (Turkey, Army, Location::land(Smy)),
        (Turkey, Fleet, Location::water(Ank)),
    ]
};

impl World {
    /// The standard map and powers with a single root season and no units.
    pub fn empty() -> World {
        World {
            map: Map::standard(),
            powers: ALL_POWERS.to_vec(),
            seasons: Seasons::new(),
            units: Vec::new(),
            retreats: Vec::new(),
            history: BTreeMap::new(),
            options: GameOptions::default(),
        }
    }

    /// The standard opening position at `0:0`.
    pub fn standard() -> World {
        let mut world = World::empty();
        let root = world.seasons.root();
        for (power, unit_type, location) in STANDARD_UNITS {
            world.push_unit(None, location, root, power, unit_type);
        }
        world
    }

    pub fn with_options(mut self, options: GameOptions) -> World {
        self.options = options;
        self
    }

    /// Places units in the root season from specs such as `"Germany A Mun"`
    /// or `"Russia F Stp nc"`.
    pub fn with_units(&self, specs: &[&str]) -> Result<World, WorldError> {
        self.with_units_at(self.seasons.root(), specs)
    }

    pub fn with_units_at(&self, season: SeasonId, specs: &[&str]) -> Result<World, WorldError> {
        let mut world = self.clone();
        for spec in specs {
            let (power, unit_type, location) = world.parse_unit_spec(spec)?;
            world = world.with_unit(power, unit_type, location, season)?.0;
        }
        Ok(world)
    }

    /// Places one new unit with no past.
    pub fn with_unit(
        &self,
        power: Power,
        unit_type: UnitType,
        location: Location,
        season: SeasonId,
    ) -> Result<(World, UnitId), WorldError> {
        if self.unit_at(location.province, season).is_some() {
            return Err(WorldError::Occupied {
                province: location.province.to_string(),
                season: self.seasons.get(season).to_string(),
            });
        }
        let mut world = self.clone();
        let id = world.push_unit(None, location, season, power, unit_type);
        Ok((world, id))
    }

    fn parse_unit_spec(&self, spec: &str) -> Result<(Power, UnitType, Location), WorldError> {
        let parts: Vec<&str> = spec.split_whitespace().collect();
        let bad = || WorldError::BadUnitSpec(spec.to_string());
        let (power, letter, province, coast) = match parts.as_slice() {
            [p, t, prov] => (*p, *t, *prov, None),
            [p, t, prov, c] => (*p, *t, *prov, Some(*c)),
            _ => return Err(bad()),
        };
        let power = self.power(power)?;
        let unit_type = letter
            .chars()
            .next()
            .filter(|_| letter.len() == 1)
            .and_then(UnitType::from_letter)
            .ok_or_else(bad)?;
        let location = match unit_type {
            UnitType::Army => self.map.land(province)?,
            UnitType::Fleet => self.map.water(province, coast)?,
        };
        Ok((power, unit_type, location))
    }

    /// Appends a unit to the arena. Lineage and occupancy are the caller's
    /// responsibility.
    pub(crate) fn push_unit(
        &mut self,
        past: Option<UnitId>,
        location: Location,
        season: SeasonId,
        power: Power,
        unit_type: UnitType,
    ) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(Unit { id, past, location, season, power, unit_type });
        id
    }

    /// Assembles the next snapshot from parts produced by a world update.
    pub(crate) fn successor(
        &self,
        seasons: Seasons,
        units: Vec<Unit>,
        retreats: Vec<RetreatingUnit>,
        history: BTreeMap<SeasonId, OrderHistory>,
    ) -> World {
        World {
            map: self.map,
            powers: self.powers.clone(),
            seasons,
            units,
            retreats,
            history,
            options: self.options.clone(),
        }
    }

    pub fn map(&self) -> &'static Map {
        self.map
    }

    pub fn powers(&self) -> &[Power] {
        &self.powers
    }

    /// Resolves a power by name or prefix among this world's powers.
    pub fn power(&self, name: &str) -> Result<Power, WorldError> {
        Power::from_name(name)
            .filter(|p| self.powers.contains(p))
            .ok_or_else(|| WorldError::UnknownPower(name.to_string()))
    }

    pub fn seasons(&self) -> &Seasons {
        &self.seasons
    }

    pub fn season(&self, turn: u32, timeline: u32) -> Result<SeasonId, WorldError> {
        self.seasons
            .find(turn, timeline)
            .ok_or(WorldError::UnknownSeason { turn, timeline })
    }

    pub fn season_info(&self, id: SeasonId) -> &Season {
        self.seasons.get(id)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    pub fn units_in(&self, season: SeasonId) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.season == season)
    }

    pub fn unit_at(&self, province: Province, season: SeasonId) -> Option<&Unit> {
        self.units
            .iter()
            .find(|u| u.season == season && u.location.province == province)
    }

    pub fn unit_at_point(&self, point: Point) -> Option<&Unit> {
        self.unit_at(point.province, point.season)
    }

    /// Looks up the unit in the named province at `(turn, timeline)`.
    pub fn unit_by_name(&self, province: &str, coord: (u32, u32)) -> Result<&Unit, WorldError> {
        let province = self.map.province(province)?;
        let season = self.season(coord.0, coord.1)?;
        self.unit_at(province, season).ok_or_else(|| WorldError::NoUnit {
            province: province.to_string(),
            season: format!("{}:{}", coord.0, coord.1),
        })
    }

    /// Units standing in a season at the front of its timeline; only these
    /// may receive new orders.
    pub fn orderable_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| self.seasons.is_head(u.season))
    }

    pub fn is_orderable(&self, unit: UnitId) -> bool {
        self.seasons.is_head(self.unit(unit).season)
    }

    pub fn retreats(&self) -> &[RetreatingUnit] {
        &self.retreats
    }

    pub fn history(&self, season: SeasonId) -> Option<&OrderHistory> {
        self.history.get(&season)
    }

    pub(crate) fn all_history(&self) -> &BTreeMap<SeasonId, OrderHistory> {
        &self.history
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }
}
