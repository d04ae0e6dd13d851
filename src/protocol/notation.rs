//! Text notation for multiversal orders.
//!
//! An order names its issuing power, the ordered unit and an action. Units
//! and destinations carry an optional `@turn:timeline` suffix; without one,
//! a unit is looked up among the timeline heads and a destination defaults
//! to the season of the unit it concerns. Split coasts use a slash.
//!
//! ```text
//! Germany A Mun@1:0 - Tyr@0:0
//! Austria F Tri S A Ven - Tyr
//! England F Nth C A Lon - Nwy
//! Russia F Stp/sc@0:0 H
//! ```

use thiserror::Error;

use crate::board::{
    Location, MapError, Order, SeasonId, Unit, UnitId, UnitType, World, WorldError,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty order")]
    Empty,

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("unknown unit type '{0}'")]
    UnknownUnitType(String),

    #[error("malformed season '{0}'; expected '<turn>:<timeline>'")]
    BadSeason(String),

    #[error("'{0}' matches units in several seasons; add '@<turn>:<timeline>'")]
    AmbiguousUnit(String),

    #[error("the unit at '{0}' is not of the given type")]
    WrongUnitType(String),

    #[error("unexpected end of order, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: &'static str, found: String },
}

struct Cursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self, expected: &'static str) -> Result<&'a str, NotationError> {
        let token = self.tokens.get(self.pos).copied().ok_or(NotationError::UnexpectedEnd(expected))?;
        self.pos += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn expect(&mut self, word: &'static str) -> Result<(), NotationError> {
        let token = self.next(word)?;
        if token.eq_ignore_ascii_case(word) {
            Ok(())
        } else {
            Err(NotationError::UnexpectedToken { expected: word, found: token.to_string() })
        }
    }

    fn finish(&self) -> Result<(), NotationError> {
        match self.peek() {
            None => Ok(()),
            Some(extra) => Err(NotationError::UnexpectedToken {
                expected: "end of order",
                found: extra.to_string(),
            }),
        }
    }
}

/// Parses `"1:0"` into `(turn, timeline)`.
pub fn parse_season(text: &str) -> Result<(u32, u32), NotationError> {
    let bad = || NotationError::BadSeason(text.to_string());
    let (turn, timeline) = text.split_once(':').ok_or_else(bad)?;
    Ok((turn.trim().parse().map_err(|_| bad())?, timeline.trim().parse().map_err(|_| bad())?))
}

/// Splits `"Stp/sc@1:0"` into province, coast and season text.
fn split_place(text: &str) -> (&str, Option<&str>, Option<&str>) {
    let (place, season) = match text.split_once('@') {
        Some((p, s)) => (p, Some(s)),
        None => (text, None),
    };
    match place.split_once('/') {
        Some((province, coast)) => (province, Some(coast), season),
        None => (place, None, season),
    }
}

fn is_unit_letter(token: &str) -> bool {
    token.len() == 1 && token.chars().next().and_then(UnitType::from_letter).is_some()
}

fn unit_type(token: &str) -> Result<UnitType, NotationError> {
    token
        .chars()
        .next()
        .filter(|_| token.len() == 1)
        .and_then(UnitType::from_letter)
        .ok_or_else(|| NotationError::UnknownUnitType(token.to_string()))
}

fn location(world: &World, unit_type: UnitType, province: &str, coast: Option<&str>) -> Result<Location, NotationError> {
    Ok(match unit_type {
        UnitType::Army => world.map().land(province)?,
        UnitType::Fleet => world.map().water(province, coast)?,
    })
}

fn season_of(world: &World, text: Option<&str>, default: SeasonId) -> Result<SeasonId, NotationError> {
    match text {
        Some(text) => {
            let (turn, timeline) = parse_season(text)?;
            Ok(world.season(turn, timeline)?)
        }
        None => Ok(default),
    }
}

/// Resolves a unit reference such as `A Mun@1:0`.
fn unit_ref<'w>(world: &'w World, letter: &str, place: &str) -> Result<&'w Unit, NotationError> {
    let unit_type = unit_type(letter)?;
    let (name, _, season) = split_place(place);
    let province = world.map().province(name)?;
    let unit = match season {
        Some(text) => {
            let (turn, timeline) = parse_season(text)?;
            world.unit_by_name(name, (turn, timeline))?
        }
        None => {
            let here: Vec<&Unit> = world.units().iter().filter(|u| u.province() == province).collect();
            let heads: Vec<&Unit> =
                here.iter().copied().filter(|u| world.seasons().is_head(u.season)).collect();
            match (heads.as_slice(), here.as_slice()) {
                ([only], _) | ([], [only]) => *only,
                ([], []) => {
                    return Err(WorldError::NoUnit {
                        province: province.to_string(),
                        season: "any season".to_string(),
                    }
                    .into())
                }
                _ => return Err(NotationError::AmbiguousUnit(place.to_string())),
            }
        }
    };
    if unit.unit_type != unit_type {
        return Err(NotationError::WrongUnitType(place.to_string()));
    }
    Ok(unit)
}

/// Resolves a destination such as `Tyr@0:0` for a unit of `unit_type`.
fn destination(
    world: &World,
    unit_type: UnitType,
    text: &str,
    default: SeasonId,
) -> Result<(Location, SeasonId), NotationError> {
    let (name, coast, season) = split_place(text);
    Ok((location(world, unit_type, name, coast)?, season_of(world, season, default)?))
}

/// The coast of a split-coast province that `unit` borders, when it borders
/// exactly one.
fn only_reachable_coast(world: &World, unit: &Unit, text: &str) -> Result<(Location, SeasonId), NotationError> {
    let (name, _, season) = split_place(text);
    let province = world.map().province(name)?;
    let reachable: Vec<Location> = world
        .map()
        .locations(province)
        .iter()
        .copied()
        .filter(|l| l.is_water() && unit.location.borders_with(*l))
        .collect();
    match reachable.as_slice() {
        [only] => Ok((*only, season_of(world, season, unit.season)?)),
        _ => Err(MapError::AmbiguousCoast(name.to_string()).into()),
    }
}

/// Parses one order against `world`.
pub fn parse_order(world: &World, text: &str) -> Result<Order, NotationError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(NotationError::Empty);
    }
    let mut cur = Cursor { tokens, pos: 0 };

    let issuer = match cur.peek() {
        Some(token) if !is_unit_letter(token) => {
            cur.pos += 1;
            Some(world.power(token)?)
        }
        _ => None,
    };

    match cur.peek() {
        Some(word) if word.eq_ignore_ascii_case("build") => {
            cur.pos += 1;
            let power = issuer.ok_or(NotationError::UnexpectedEnd("power before 'build'"))?;
            let unit_type = unit_type(cur.next("unit type")?)?;
            let place = cur.next("location")?;
            let (name, coast, season) = split_place(place);
            let location = location(world, unit_type, name, coast)?;
            let season = season_of(world, season, world.seasons().root())?;
            cur.finish()?;
            return Ok(Order::Build { power, location, season, unit_type });
        }
        Some(word) if word.eq_ignore_ascii_case("sustain") => {
            cur.pos += 1;
            let power = issuer.ok_or(NotationError::UnexpectedEnd("power before 'sustain'"))?;
            let time_center = world.map().land(cur.next("time center")?)?;
            let token = cur.next("timeline")?;
            let timeline = token.parse().map_err(|_| NotationError::UnexpectedToken {
                expected: "timeline number",
                found: token.to_string(),
            })?;
            cur.finish()?;
            return Ok(Order::Sustain { power, time_center, timeline });
        }
        _ => {}
    }

    let unit = unit_ref(world, cur.next("unit type")?, cur.next("unit location")?)?;
    let power = issuer.unwrap_or(unit.power);
    let action = cur.next("action (H, -, S, C, D, R)")?;
    let order = match action.to_ascii_uppercase().as_str() {
        "H" => Order::Hold { power, unit: unit.id },
        "-" => {
            let text = cur.next("destination")?;
            let (dest, season) = match destination(world, unit.unit_type, text, unit.season) {
                Err(NotationError::Map(MapError::AmbiguousCoast(_))) => only_reachable_coast(world, unit, text)?,
                other => other?,
            };
            Order::Move { power, unit: unit.id, dest, season }
        }
        "S" => {
            let target = unit_ref(world, cur.next("supported unit type")?, cur.next("supported unit")?)?;
            match cur.next("H or -")? {
                "H" | "h" => Order::SupportHold { power, unit: unit.id, target: target.id },
                "-" => {
                    let (dest, season) =
                        destination(world, target.unit_type, cur.next("destination")?, target.season)?;
                    Order::SupportMove { power, unit: unit.id, target: target.id, dest, season }
                }
                other => {
                    return Err(NotationError::UnexpectedToken {
                        expected: "H or -",
                        found: other.to_string(),
                    })
                }
            }
        }
        "C" => {
            let target = unit_ref(world, cur.next("convoyed army")?, cur.next("convoyed army location")?)?;
            cur.expect("-")?;
            let (dest, season) = destination(world, UnitType::Army, cur.next("destination")?, target.season)?;
            Order::Convoy { power, unit: unit.id, target: target.id, dest, season }
        }
        "D" => Order::Disband { power, unit: unit.id },
        "R" => {
            let (dest, _) = destination(world, unit.unit_type, cur.next("destination")?, unit.season)?;
            Order::Retreat { power, unit: unit.id, dest }
        }
        _ => {
            return Err(NotationError::UnexpectedToken {
                expected: "action (H, -, S, C, D, R)",
                found: action.to_string(),
            })
        }
    };
    cur.finish()?;
    Ok(order)
}

fn unit_text(world: &World, unit: UnitId) -> String {
    let unit = world.unit(unit);
    format!("{} {}@{}", unit.unit_type.letter(), unit.location, world.season_info(unit.season))
}

/// Renders an order with every season spelled out.
pub fn format_order(world: &World, order: &Order) -> String {
    let at = |season: SeasonId| world.season_info(season);
    let power = order.power();
    match *order {
        Order::Hold { unit, .. } => format!("{power} {} H", unit_text(world, unit)),
        Order::Move { unit, dest, season, .. } => {
            format!("{power} {} - {dest}@{}", unit_text(world, unit), at(season))
        }
        Order::SupportHold { unit, target, .. } => {
            format!("{power} {} S {} H", unit_text(world, unit), unit_text(world, target))
        }
        Order::SupportMove { unit, target, dest, season, .. } => format!(
            "{power} {} S {} - {dest}@{}",
            unit_text(world, unit),
            unit_text(world, target),
            at(season)
        ),
        Order::Convoy { unit, target, dest, season, .. } => format!(
            "{power} {} C {} - {dest}@{}",
            unit_text(world, unit),
            unit_text(world, target),
            at(season)
        ),
        Order::Disband { unit, .. } => format!("{power} {} D", unit_text(world, unit)),
        Order::Retreat { unit, dest, .. } => format!("{power} {} R {dest}", unit_text(world, unit)),
        Order::Build { location, season, unit_type, .. } => {
            format!("{power} build {} {location}@{}", unit_type.letter(), at(season))
        }
        Order::Sustain { time_center, timeline, .. } => {
            format!("{power} sustain {time_center} {timeline}")
        }
    }
}

/// Parses orders separated by `;`.
pub fn parse_orders(world: &World, text: &str) -> Result<Vec<Order>, NotationError> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_order(world, s))
        .collect()
}
