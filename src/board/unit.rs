//! Units as immutable lineages.
//!
//! A unit never moves. Holding or moving into the next season creates a new
//! unit whose `past` points at the old one, so every season keeps its own
//! copy. Units are compared by [`UnitId`], never by position.

use std::fmt;

use super::map::{Location, LocationKind};
use super::province::{Power, Province};
use super::season::SeasonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    pub const fn letter(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    pub fn from_letter(c: char) -> Option<UnitType> {
        match c.to_ascii_uppercase() {
            'A' => Some(UnitType::Army),
            'F' => Some(UnitType::Fleet),
            _ => None,
        }
    }

    /// The kind of location this unit type occupies.
    pub const fn terrain(self) -> LocationKind {
        match self {
            UnitType::Army => LocationKind::Land,
            UnitType::Fleet => LocationKind::Water,
        }
    }
}

/// Index of a unit in its world's unit arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub(crate) u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// "Where and when": a province in a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub province: Province,
    pub season: SeasonId,
}

impl Point {
    pub const fn new(province: Province, season: SeasonId) -> Self {
        Point { province, season }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub past: Option<UnitId>,
    pub location: Location,
    pub season: SeasonId,
    pub power: Power,
    pub unit_type: UnitType,
}

impl Unit {
    pub fn point(&self) -> Point {
        Point::new(self.location.province, self.season)
    }

    pub fn province(&self) -> Province {
        self.location.province
    }

    pub fn is_army(&self) -> bool {
        self.unit_type == UnitType::Army
    }

    pub fn is_fleet(&self) -> bool {
        self.unit_type == UnitType::Fleet
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.power, self.unit_type.letter(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(UnitType::from_letter('a'), Some(UnitType::Army));
        assert_eq!(UnitType::from_letter('F'), Some(UnitType::Fleet));
        assert_eq!(UnitType::from_letter('x'), None);
        assert_eq!(UnitType::Fleet.letter(), 'F');
    }

    #[test]
    fn terrain_matches_type() {
        assert_eq!(UnitType::Army.terrain(), LocationKind::Land);
        assert_eq!(UnitType::Fleet.terrain(), LocationKind::Water);
    }
}
