//! Orders and the predicates the adjudicator builds its decision graph from.
//!
//! Every order carries the power that issued it. Unit orders name the unit
//! by id; orders with a destination name both the location and the season,
//! since a move may cross turns and timelines.

use std::fmt;

use super::map::Location;
use super::province::{Power, Province};
use super::season::SeasonId;
use super::unit::{Point, UnitId, UnitType};
use super::world::World;

/// An order of any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    Hold {
        power: Power,
        unit: UnitId,
    },
    Move {
        power: Power,
        unit: UnitId,
        dest: Location,
        season: SeasonId,
    },
    /// A fleet carrying `target` to `dest` in `season`.
    Convoy {
        power: Power,
        unit: UnitId,
        target: UnitId,
        dest: Location,
        season: SeasonId,
    },
    SupportHold {
        power: Power,
        unit: UnitId,
        target: UnitId,
    },
    SupportMove {
        power: Power,
        unit: UnitId,
        target: UnitId,
        dest: Location,
        season: SeasonId,
    },
    Disband {
        power: Power,
        unit: UnitId,
    },
    Retreat {
        power: Power,
        unit: UnitId,
        dest: Location,
    },
    Build {
        power: Power,
        location: Location,
        season: SeasonId,
        unit_type: UnitType,
    },
    /// Keeps a timeline alive from one of the power's time centers.
    Sustain {
        power: Power,
        time_center: Location,
        timeline: u32,
    },
}

/// The tag of an [`Order`], used for phase allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKind {
    Hold,
    Move,
    Convoy,
    SupportHold,
    SupportMove,
    Disband,
    Retreat,
    Build,
    Sustain,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Order {
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Hold { .. } => OrderKind::Hold,
            Order::Move { .. } => OrderKind::Move,
            Order::Convoy { .. } => OrderKind::Convoy,
            Order::SupportHold { .. } => OrderKind::SupportHold,
            Order::SupportMove { .. } => OrderKind::SupportMove,
            Order::Disband { .. } => OrderKind::Disband,
            Order::Retreat { .. } => OrderKind::Retreat,
            Order::Build { .. } => OrderKind::Build,
            Order::Sustain { .. } => OrderKind::Sustain,
        }
    }

    pub fn power(&self) -> Power {
        match *self {
            Order::Hold { power, .. }
            | Order::Move { power, .. }
            | Order::Convoy { power, .. }
            | Order::SupportHold { power, .. }
            | Order::SupportMove { power, .. }
            | Order::Disband { power, .. }
            | Order::Retreat { power, .. }
            | Order::Build { power, .. }
            | Order::Sustain { power, .. } => power,
        }
    }

    /// The ordered unit. Build and sustain orders have none.
    pub fn unit(&self) -> Option<UnitId> {
        match *self {
            Order::Hold { unit, .. }
            | Order::Move { unit, .. }
            | Order::Convoy { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Disband { unit, .. }
            | Order::Retreat { unit, .. } => Some(unit),
            Order::Build { .. } | Order::Sustain { .. } => None,
        }
    }

    /// The unit a convoy or support order is given for.
    pub fn target(&self) -> Option<UnitId> {
        match *self {
            Order::Convoy { target, .. }
            | Order::SupportHold { target, .. }
            | Order::SupportMove { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Destination location and season of moves, convoys and support-moves.
    pub fn destination(&self) -> Option<(Location, SeasonId)> {
        match *self {
            Order::Move { dest, season, .. }
            | Order::Convoy { dest, season, .. }
            | Order::SupportMove { dest, season, .. } => Some((dest, season)),
            _ => None,
        }
    }

    pub fn dest_point(&self) -> Option<Point> {
        self.destination().map(|(loc, season)| Point::new(loc.province, season))
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Order::Move { .. })
    }

    pub fn is_support(&self) -> bool {
        matches!(self, Order::SupportHold { .. } | Order::SupportMove { .. })
    }

    /// Head-to-head: each move's unit stands at the other's destination.
    pub fn is_opposing(&self, other: &Order, world: &World) -> bool {
        let (Some(here), Some(there)) = (self.move_ends(world), other.move_ends(world)) else {
            return false;
        };
        here.0 == there.1 && here.1 == there.0
    }

    fn move_ends(&self, world: &World) -> Option<(Point, Point)> {
        match *self {
            Order::Move { unit, .. } => {
                let dest = self.dest_point()?;
                Some((world.unit(unit).point(), dest))
            }
            _ => None,
        }
    }

    /// Two different moves into the same province of the same season. The
    /// coast does not matter.
    pub fn is_competing(&self, other: &Order) -> bool {
        match (self, other) {
            (Order::Move { unit: a, .. }, Order::Move { unit: b, .. }) if a != b => {
                self.dest_point() == other.dest_point()
            }
            _ => false,
        }
    }

    /// A support-move naming exactly this move: same unit, season, and
    /// location including coast.
    pub fn is_support_for(&self, mv: &Order) -> bool {
        match (*self, *mv) {
            (
                Order::SupportMove { target, dest, season, .. },
                Order::Move { unit, dest: move_dest, season: move_season, .. },
            ) => target == unit && dest == move_dest && season == move_season,
            _ => false,
        }
    }

    /// A different order's move ending where this order's unit stands.
    pub fn is_incoming(&self, mv: &Order, world: &World) -> bool {
        let Some(unit) = self.unit() else {
            return false;
        };
        mv.is_move() && self != mv && mv.dest_point() == Some(world.unit(unit).point())
    }

    /// Province of the ordered unit, if any.
    pub fn origin(&self, world: &World) -> Option<Province> {
        self.unit().map(|u| world.unit(u).province())
    }
}
