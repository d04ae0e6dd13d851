//! The standard map as a graph of locations.
//!
//! A province holds one land location (armies) and zero or more water
//! locations (fleets): one for a sea or ordinary coast, one per named coast
//! for split-coast provinces. Borders connect locations of the same kind and
//! are symmetric. The map is built once on first use and shared read-only.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use thiserror::Error;

use super::province::{Coast, Province, Terrain, ALL_PROVINCES, PROVINCE_COUNT};

/// Failures looking up map entities by name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("unknown province '{0}'")]
    UnknownProvince(String),
    #[error("province '{0}' has no land location")]
    NoLand(String),
    #[error("province '{0}' has no water location")]
    NoWater(String),
    #[error("province '{0}' has several coasts; name one")]
    AmbiguousCoast(String),
    #[error("province '{province}' has no coast '{coast}'")]
    UnknownCoast { province: String, coast: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationKind {
    Land,
    Water,
}

/// A locus of occupancy inside a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub province: Province,
    pub kind: LocationKind,
    pub coast: Coast,
}

impl Location {
    pub const fn land(province: Province) -> Self {
        Self { province, kind: LocationKind::Land, coast: Coast::None }
    }

    /// The single water location of a sea or ordinary coastal province.
    pub const fn water(province: Province) -> Self {
        Self { province, kind: LocationKind::Water, coast: Coast::None }
    }

    /// A named coast of a split-coast province.
    pub const fn coast(province: Province, coast: Coast) -> Self {
        Self { province, kind: LocationKind::Water, coast }
    }

    pub fn is_land(self) -> bool {
        self.kind == LocationKind::Land
    }

    pub fn is_water(self) -> bool {
        self.kind == LocationKind::Water
    }

    /// Locations sharing a border with this one.
    pub fn borders(self) -> &'static [Location] {
        Map::standard().borders(self)
    }

    pub fn borders_with(self, other: Location) -> bool {
        self.borders().contains(&other)
    }

    /// True if this location borders any location of `province`.
    pub fn borders_province(self, province: Province) -> bool {
        self.borders().iter().any(|l| l.province == province)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.province)?;
        if self.coast != Coast::None {
            write!(f, "/{}", self.coast.abbr())?;
        }
        Ok(())
    }
}

/// Read-only location graph of the standard map.
#[derive(Debug)]
pub struct Map {
    locations: Vec<Vec<Location>>,
    borders: HashMap<Location, Vec<Location>>,
}

static STANDARD: LazyLock<Map> = LazyLock::new(Map::build);

impl Map {
    /// The shared standard map.
    pub fn standard() -> &'static Map {
        &STANDARD
    }

    fn build() -> Map {
        let mut locations = vec![Vec::new(); PROVINCE_COUNT];
        for p in ALL_PROVINCES {
            let locs = &mut locations[p as usize];
            if p.terrain() != Terrain::Sea {
                locs.push(Location::land(p));
            }
            match (p.terrain(), p.coasts()) {
                (Terrain::Inland, _) => {}
                (_, []) => locs.push(Location::water(p)),
                (_, coasts) => locs.extend(coasts.iter().map(|c| Location::coast(p, *c))),
            }
        }

        let mut borders: HashMap<Location, Vec<Location>> = HashMap::new();
        for (from, tos) in LAND_BORDERS {
            borders.insert(
                Location::land(*from),
                tos.iter().map(|to| Location::land(*to)).collect(),
            );
        }
        for (from, fc, tos) in WATER_BORDERS {
            borders.insert(
                Location::coast(*from, *fc),
                tos.iter().map(|(to, tc)| Location::coast(*to, *tc)).collect(),
            );
        }

        Map { locations, borders }
    }

    /// Looks up a province by abbreviation, alias, or name.
    pub fn province(&self, name: &str) -> Result<Province, MapError> {
        Province::lookup(name).ok_or_else(|| MapError::UnknownProvince(name.to_string()))
    }

    pub fn locations(&self, province: Province) -> &[Location] {
        &self.locations[province as usize]
    }

    pub fn borders(&self, location: Location) -> &[Location] {
        self.borders.get(&location).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The land location of the named province.
    pub fn land(&self, name: &str) -> Result<Location, MapError> {
        let province = self.province(name)?;
        self.locations(province)
            .iter()
            .copied()
            .find(|l| l.is_land())
            .ok_or_else(|| MapError::NoLand(name.to_string()))
    }

    /// The water location of the named province. `coast` is required only
    /// for split-coast provinces.
    pub fn water(&self, name: &str, coast: Option<&str>) -> Result<Location, MapError> {
        let province = self.province(name)?;
        let waters: Vec<Location> = self
            .locations(province)
            .iter()
            .copied()
            .filter(|l| l.is_water())
            .collect();
        match (coast, waters.as_slice()) {
            (_, []) => Err(MapError::NoWater(name.to_string())),
            (None, [only]) => Ok(*only),
            (None, _) => Err(MapError::AmbiguousCoast(name.to_string())),
            (Some(text), _) => {
                let wanted = Coast::from_abbr(text);
                waters
                    .iter()
                    .copied()
                    .find(|l| Some(l.coast) == wanted)
                    .ok_or_else(|| MapError::UnknownCoast {
                        province: name.to_string(),
                        coast: text.to_string(),
                    })
            }
        }
    }

    /// True for provinces with both a land and a water location.
    pub fn is_coastal(&self, province: Province) -> bool {
        let locs = self.locations(province);
        locs.iter().any(|l| l.is_land()) && locs.iter().any(|l| l.is_water())
    }
}

const N: Coast = Coast::None;
const NC: Coast = Coast::North;
const SC: Coast = Coast::South;
const EC: Coast = Coast::East;

use Province::*;

const LAND_BORDERS: &[(Province, &[Province])] = &[
    (Alb, &[Gre, Ser, Tri]),
    (Ank, &[Arm, Con, Smy]),
    (Apu, &[Nap, Rom, Ven]),
    (Arm, &[Ank, Sev, Smy, Syr]),
    (Bel, &[Bur, Hol, Pic, Ruh]),
    (Ber, &[Kie, Mun, Pru, Sil]),
    (Boh, &[Gal, Mun, Sil, Tyr, Vie]),
    (Bre, &[Gas, Par, Pic]),
    (Bud, &[Gal, Rum, Ser, Tri, Vie]),
    (Bul, &[Con, Gre, Rum, Ser]),
    (Bur, &[Bel, Gas, Mar, Mun, Par, Pic, Ruh]),
    (Cly, &[Edi, Lvp]),
    (Con, &[Ank, Bul, Smy]),
    (Den, &[Kie, Swe]),
    (Edi, &[Cly, Lvp, Yor]),
    (Fin, &[Nwy, Stp, Swe]),
    (Gal, &[Boh, Bud, Rum, Sil, Ukr, Vie, War]),
    (Gas, &[Bre, Bur, Mar, Par, Spa]),
    (Gre, &[Alb, Bul, Ser]),
    (Hol, &[Bel, Ruh]),
    (Kie, &[Ber, Den, Mun, Ruh]),
    (Lon, &[Wal, Yor]),
    (Lvn, &[Mos, Pru, Stp, War]),
    (Lvp, &[Cly, Edi, Wal, Yor]),
    (Mar, &[Bur, Gas, Pie, Spa]),
    (Mos, &[Lvn, Sev, Stp, Ukr, War]),
    (Mun, &[Ber, Boh, Bur, Kie, Ruh, Sil, Tyr]),
    (Naf, &[Tun]),
    (Nap, &[Apu, Rom]),
    (Nwy, &[Fin, Stp, Swe]),
    (Par, &[Bre, Bur, Gas, Pic]),
    (Pic, &[Bel, Bre, Bur, Par]),
    (Pie, &[Mar, Tus, Tyr, Ven]),
    (Por, &[Spa]),
    (Pru, &[Ber, Lvn, Sil, War]),
    (Rom, &[Apu, Nap, Tus, Ven]),
    (Ruh, &[Bel, Bur, Hol, Kie, Mun]),
    (Rum, &[Bud, Bul, Gal, Ser, Sev, Ukr]),
    (Ser, &[Alb, Bud, Bul, Gre, Rum, Tri]),
    (Sev, &[Arm, Mos, Rum, Ukr]),
    (Sil, &[Ber, Boh, Gal, Mun, Pru, War]),
    (Smy, &[Ank, Arm, Con, Syr]),
    (Spa, &[Gas, Mar, Por]),
    (Stp, &[Fin, Lvn, Mos, Nwy]),
    (Swe, &[Den, Fin, Nwy]),
    (Syr, &[Arm, Smy]),
    (Tri, &[Alb, Bud, Ser, Tyr, Ven, Vie]),
    (Tun, &[Naf]),
    (Tus, &[Pie, Rom, Ven]),
    (Tyr, &[Boh, Mun, Pie, Tri, Ven, Vie]),
    (Ukr, &[Gal, Mos, Rum, Sev, War]),
    (Ven, &[Apu, Pie, Rom, Tri, Tus, Tyr]),
    (Vie, &[Boh, Bud, Gal, Tri, Tyr]),
    (Wal, &[Lon, Lvp, Yor]),
    (War, &[Gal, Lvn, Mos, Pru, Sil, Ukr]),
    (Yor, &[Edi, Lon, Lvp, Wal]),
];

const WATER_BORDERS: &[(Province, Coast, &[(Province, Coast)])] = &[
    (Adr, N, &[(Alb, N), (Apu, N), (Ion, N), (Tri, N), (Ven, N)]),
    (Aeg, N, &[(Bul, SC), (Con, N), (Eas, N), (Gre, N), (Ion, N), (Smy, N)]),
    (Alb, N, &[(Adr, N), (Gre, N), (Ion, N), (Tri, N)]),
    (Ank, N, &[(Arm, N), (Bla, N), (Con, N)]),
    (Apu, N, &[(Adr, N), (Ion, N), (Nap, N), (Ven, N)]),
    (Arm, N, &[(Ank, N), (Bla, N), (Sev, N)]),
    (Bal, N, &[(Ber, N), (Bot, N), (Den, N), (Kie, N), (Lvn, N), (Pru, N), (Swe, N)]),
    (Bar, N, &[(Nrg, N), (Nwy, N), (Stp, NC)]),
    (Bel, N, &[(Eng, N), (Hol, N), (Nth, N), (Pic, N)]),
    (Ber, N, &[(Bal, N), (Kie, N), (Pru, N)]),
    (Bla, N, &[(Ank, N), (Arm, N), (Bul, EC), (Con, N), (Rum, N), (Sev, N)]),
    (Bot, N, &[(Bal, N), (Fin, N), (Lvn, N), (Stp, SC), (Swe, N)]),
    (Bre, N, &[(Eng, N), (Gas, N), (Mao, N), (Pic, N)]),
    (Bul, EC, &[(Bla, N), (Con, N), (Rum, N)]),
    (Bul, SC, &[(Aeg, N), (Con, N), (Gre, N)]),
    (Cly, N, &[(Edi, N), (Lvp, N), (Nao, N), (Nrg, N)]),
    (Con, N, &[(Aeg, N), (Ank, N), (Bla, N), (Bul, EC), (Bul, SC), (Smy, N)]),
    (Den, N, &[(Bal, N), (Hel, N), (Kie, N), (Nth, N), (Ska, N), (Swe, N)]),
    (Eas, N, &[(Aeg, N), (Ion, N), (Smy, N), (Syr, N)]),
    (Edi, N, &[(Cly, N), (Nrg, N), (Nth, N), (Yor, N)]),
    (Eng, N, &[(Bel, N), (Bre, N), (Iri, N), (Lon, N), (Mao, N), (Nth, N), (Pic, N), (Wal, N)]),
    (Fin, N, &[(Bot, N), (Stp, SC), (Swe, N)]),
    (Gas, N, &[(Bre, N), (Mao, N), (Spa, NC)]),
    (Gol, N, &[(Mar, N), (Pie, N), (Spa, SC), (Tus, N), (Tys, N), (Wes, N)]),
    (Gre, N, &[(Aeg, N), (Alb, N), (Bul, SC), (Ion, N)]),
    (Hel, N, &[(Den, N), (Hol, N), (Kie, N), (Nth, N)]),
    (Hol, N, &[(Bel, N), (Hel, N), (Nth, N)]),
    (Ion, N, &[(Adr, N), (Aeg, N), (Alb, N), (Apu, N), (Eas, N), (Gre, N), (Nap, N), (Tun, N), (Tys, N)]),
    (Iri, N, &[(Eng, N), (Lvp, N), (Mao, N), (Nao, N), (Wal, N)]),
    (Kie, N, &[(Bal, N), (Ber, N), (Den, N), (Hel, N)]),
    (Lon, N, &[(Eng, N), (Nth, N), (Wal, N), (Yor, N)]),
    (Lvn, N, &[(Bal, N), (Bot, N), (Pru, N), (Stp, SC)]),
    (Lvp, N, &[(Cly, N), (Iri, N), (Nao, N), (Wal, N)]),
    (Mao, N, &[(Bre, N), (Eng, N), (Gas, N), (Iri, N), (Naf, N), (Nao, N), (Por, N), (Spa, NC), (Spa, SC), (Wes, N)]),
    (Mar, N, &[(Gol, N), (Pie, N), (Spa, SC)]),
    (Naf, N, &[(Mao, N), (Tun, N), (Wes, N)]),
    (Nao, N, &[(Cly, N), (Iri, N), (Lvp, N), (Mao, N), (Nrg, N)]),
    (Nap, N, &[(Apu, N), (Ion, N), (Rom, N), (Tys, N)]),
    (Nrg, N, &[(Bar, N), (Cly, N), (Edi, N), (Nao, N), (Nth, N), (Nwy, N)]),
    (Nth, N, &[(Bel, N), (Den, N), (Edi, N), (Eng, N), (Hel, N), (Hol, N), (Lon, N), (Nrg, N), (Nwy, N), (Ska, N), (Yor, N)]),
    (Nwy, N, &[(Bar, N), (Nrg, N), (Nth, N), (Ska, N), (Stp, NC), (Swe, N)]),
    (Pic, N, &[(Bel, N), (Bre, N), (Eng, N)]),
    (Pie, N, &[(Gol, N), (Mar, N), (Tus, N)]),
    (Por, N, &[(Mao, N), (Spa, NC), (Spa, SC)]),
    (Pru, N, &[(Bal, N), (Ber, N), (Lvn, N)]),
    (Rom, N, &[(Nap, N), (Tus, N), (Tys, N)]),
    (Rum, N, &[(Bla, N), (Bul, EC), (Sev, N)]),
    (Sev, N, &[(Arm, N), (Bla, N), (Rum, N)]),
    (Ska, N, &[(Den, N), (Nth, N), (Nwy, N), (Swe, N)]),
    (Smy, N, &[(Aeg, N), (Con, N), (Eas, N), (Syr, N)]),
    (Spa, NC, &[(Gas, N), (Mao, N), (Por, N)]),
    (Spa, SC, &[(Gol, N), (Mao, N), (Mar, N), (Por, N), (Wes, N)]),
    (Stp, NC, &[(Bar, N), (Nwy, N)]),
    (Stp, SC, &[(Bot, N), (Fin, N), (Lvn, N)]),
    (Swe, N, &[(Bal, N), (Bot, N), (Den, N), (Fin, N), (Nwy, N), (Ska, N)]),
    (Syr, N, &[(Eas, N), (Smy, N)]),
    (Tri, N, &[(Adr, N), (Alb, N), (Ven, N)]),
    (Tun, N, &[(Ion, N), (Naf, N), (Tys, N), (Wes, N)]),
    (Tus, N, &[(Gol, N), (Pie, N), (Rom, N), (Tys, N)]),
    (Tys, N, &[(Gol, N), (Ion, N), (Nap, N), (Rom, N), (Tun, N), (Tus, N), (Wes, N)]),
    (Ven, N, &[(Adr, N), (Apu, N), (Tri, N)]),
    (Wal, N, &[(Eng, N), (Iri, N), (Lon, N), (Lvp, N)]),
    (Wes, N, &[(Gol, N), (Mao, N), (Naf, N), (Spa, SC), (Tun, N), (Tys, N)]),
    (Yor, N, &[(Edi, N), (Lon, N), (Nth, N)]),
];
