//! Provinces, powers, and coasts of the standard map.
//!
//! Every province carries static metadata: display name, terrain, whether it
//! is a supply or time center, its home power, split coasts, and any
//! alternate abbreviations players use for it.

use std::fmt;

/// The number of provinces on the standard map.
pub const PROVINCE_COUNT: usize = 75;

/// A province on the standard map, ordered alphabetically by abbreviation.
///
/// The discriminant indexes [`PROVINCE_INFO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Province {
    Adr, Aeg, Alb, Ank, Apu, Arm, Bal, Bar, Bel, Ber, Bla, Boh, Bot, Bre, Bud, Bul, Bur, Cly,
    Con, Den, Eas, Edi, Eng, Fin, Gal, Gas, Gol, Gre, Hel, Hol, Ion, Iri, Kie, Lon, Lvn, Lvp,
    Mao, Mar, Mos, Mun, Naf, Nao, Nap, Nrg, Nth, Nwy, Par, Pic, Pie, Por, Pru, Rom, Ruh, Rum,
    Ser, Sev, Sil, Ska, Smy, Spa, Stp, Swe, Syr, Tri, Tun, Tus, Tyr, Tys, Ukr, Ven, Vie, Wal,
    War, Wes, Yor,
}

use Province::*;

/// All provinces in discriminant order.
pub const ALL_PROVINCES: [Province; PROVINCE_COUNT] = [
    Adr, Aeg, Alb, Ank, Apu, Arm, Bal, Bar, Bel, Ber, Bla, Boh, Bot, Bre, Bud, Bul, Bur, Cly,
    Con, Den, Eas, Edi, Eng, Fin, Gal, Gas, Gol, Gre, Hel, Hol, Ion, Iri, Kie, Lon, Lvn, Lvp,
    Mao, Mar, Mos, Mun, Naf, Nao, Nap, Nrg, Nth, Nwy, Par, Pic, Pie, Por, Pru, Rom, Ruh, Rum,
    Ser, Sev, Sil, Ska, Smy, Spa, Stp, Swe, Syr, Tri, Tun, Tus, Tyr, Tys, Ukr, Ven, Vie, Wal,
    War, Wes, Yor,
];

impl Province {
    fn info(self) -> &'static ProvinceInfo {
        &PROVINCE_INFO[self as usize]
    }

    /// Canonical lowercase abbreviation, e.g. `"mun"`.
    pub fn abbr(self) -> &'static str {
        self.info().abbr
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn terrain(self) -> Terrain {
        self.info().terrain
    }

    /// True for supply centers, including time centers.
    pub fn is_supply_center(self) -> bool {
        self.info().center != Center::Plain
    }

    /// True for the seven home capitals that anchor time travel.
    pub fn is_time_center(self) -> bool {
        self.info().center == Center::Time
    }

    pub fn home_power(self) -> Option<Power> {
        self.info().home
    }

    /// Named coasts of a split-coast province; empty for everything else.
    pub fn coasts(self) -> &'static [Coast] {
        self.info().coasts
    }

    pub fn has_coasts(self) -> bool {
        !self.info().coasts.is_empty()
    }

    /// Looks up a province by abbreviation, alias, or full name, ignoring case.
    pub fn lookup(text: &str) -> Option<Province> {
        let needle = text.trim().to_ascii_lowercase();
        ALL_PROVINCES.iter().copied().find(|p| {
            let info = p.info();
            info.abbr == needle
                || info.aliases.contains(&needle.as_str())
                || info.name.eq_ignore_ascii_case(&needle)
        })
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbr = self.abbr();
        let mut chars = abbr.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

/// Named coast of a split-coast province. `None` is the single coast of an
/// ordinary coastal province or the open water of a sea province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coast {
    None,
    North,
    South,
    East,
}

impl Coast {
    pub const fn abbr(self) -> &'static str {
        match self {
            Coast::None => "",
            Coast::North => "nc",
            Coast::South => "sc",
            Coast::East => "ec",
        }
    }

    pub fn from_abbr(s: &str) -> Option<Coast> {
        match s.to_ascii_lowercase().as_str() {
            "" => Some(Coast::None),
            "nc" | "north coast" => Some(Coast::North),
            "sc" | "south coast" => Some(Coast::South),
            "ec" | "east coast" => Some(Coast::East),
            _ => Option::None,
        }
    }
}

/// Terrain class of a province, which decides the locations it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Land only; armies.
    Inland,
    /// Water only; fleets.
    Sea,
    /// Land plus one or more coasts.
    Coastal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Center {
    Plain,
    Supply,
    Time,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Capitalized name, e.g. `"Germany"`.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "Austria",
            Power::England => "England",
            Power::France => "France",
            Power::Germany => "Germany",
            Power::Italy => "Italy",
            Power::Russia => "Russia",
            Power::Turkey => "Turkey",
        }
    }

    /// Resolves a power by case-insensitive name or unambiguous prefix
    /// (`"ger"`, `"Aus"`).
    pub fn from_name(name: &str) -> Option<Power> {
        let needle = name.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Option::None;
        }
        let mut matches = ALL_POWERS
            .iter()
            .copied()
            .filter(|p| p.name().to_ascii_lowercase().starts_with(&needle));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => Option::None,
            Option::None => Some(first),
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static metadata for a province.
pub struct ProvinceInfo {
    pub abbr: &'static str,
    pub name: &'static str,
    pub terrain: Terrain,
    center: Center,
    pub home: Option<Power>,
    pub coasts: &'static [Coast],
    pub aliases: &'static [&'static str],
}

const fn row(
    abbr: &'static str,
    name: &'static str,
    terrain: Terrain,
    center: Center,
    home: Option<Power>,
    coasts: &'static [Coast],
    aliases: &'static [&'static str],
) -> ProvinceInfo {
    ProvinceInfo { abbr, name, terrain, center, home, coasts, aliases }
}

mod table {
    pub(super) use super::Center::{Plain, Supply, Time};
    pub(super) use super::Coast::{East as EC, North as NC, South as SC};
    pub(super) use super::Power::*;
    pub(super) use super::Terrain::{Coastal, Inland, Sea};
}

use table::*;

/// Indexed by `Province as usize`.
pub static PROVINCE_INFO: [ProvinceInfo; PROVINCE_COUNT] = [
    row("adr", "Adriatic Sea", Sea, Plain, None, &[], &["ads"]),
    row("aeg", "Aegean Sea", Sea, Plain, None, &[], &[]),
    row("alb", "Albania", Coastal, Plain, None, &[], &[]),
    row("ank", "Ankara", Coastal, Supply, Some(Turkey), &[], &[]),
    row("apu", "Apulia", Coastal, Plain, None, &[], &[]),
    row("arm", "Armenia", Coastal, Plain, None, &[], &[]),
    row("bal", "Baltic Sea", Sea, Plain, None, &[], &[]),
    row("bar", "Barents Sea", Sea, Plain, None, &[], &[]),
    row("bel", "Belgium", Coastal, Supply, None, &[], &[]),
    row("ber", "Berlin", Coastal, Time, Some(Germany), &[], &[]),
    row("bla", "Black Sea", Sea, Plain, None, &[], &[]),
    row("boh", "Bohemia", Inland, Plain, None, &[], &[]),
    row("bot", "Gulf of Bothnia", Sea, Plain, None, &[], &["gob"]),
    row("bre", "Brest", Coastal, Supply, Some(France), &[], &[]),
    row("bud", "Budapest", Inland, Supply, Some(Austria), &[], &[]),
    row("bul", "Bulgaria", Coastal, Supply, None, &[EC, SC], &[]),
    row("bur", "Burgundy", Inland, Plain, None, &[], &[]),
    row("cly", "Clyde", Coastal, Plain, None, &[], &[]),
    row("con", "Constantinople", Coastal, Time, Some(Turkey), &[], &[]),
    row("den", "Denmark", Coastal, Supply, None, &[], &[]),
    row("eas", "Eastern Mediterranean", Sea, Plain, None, &[], &["ems"]),
    row("edi", "Edinburgh", Coastal, Supply, Some(England), &[], &[]),
    row("eng", "English Channel", Sea, Plain, None, &[], &["enc", "ech"]),
    row("fin", "Finland", Coastal, Plain, None, &[], &[]),
    row("gal", "Galicia", Inland, Plain, None, &[], &[]),
    row("gas", "Gascony", Coastal, Plain, None, &[], &[]),
    row("gol", "Gulf of Lyon", Sea, Plain, None, &[], &["lyo"]),
    row("gre", "Greece", Coastal, Supply, None, &[], &[]),
    row("hel", "Heligoland Bight", Sea, Plain, None, &[], &["hgb"]),
    row("hol", "Holland", Coastal, Supply, None, &[], &[]),
    row("ion", "Ionian Sea", Sea, Plain, None, &[], &["ios", "ins"]),
    row("iri", "Irish Sea", Sea, Plain, None, &[], &["irs"]),
    row("kie", "Kiel", Coastal, Supply, Some(Germany), &[], &[]),
    row("lon", "London", Coastal, Time, Some(England), &[], &[]),
    row("lvn", "Livonia", Coastal, Plain, None, &[], &["lva"]),
    row("lvp", "Liverpool", Coastal, Supply, Some(England), &[], &["lpl"]),
    row("mao", "Mid-Atlantic Ocean", Sea, Plain, None, &[], &["mid"]),
    row("mar", "Marseilles", Coastal, Supply, Some(France), &[], &[]),
    row("mos", "Moscow", Inland, Time, Some(Russia), &[], &[]),
    row("mun", "Munich", Inland, Supply, Some(Germany), &[], &[]),
    row("naf", "North Africa", Coastal, Plain, None, &[], &[]),
    row("nao", "North Atlantic Ocean", Sea, Plain, None, &[], &["nat"]),
    row("nap", "Naples", Coastal, Supply, Some(Italy), &[], &[]),
    row("nrg", "Norwegian Sea", Sea, Plain, None, &[], &["nws", "nwg"]),
    row("nth", "North Sea", Sea, Plain, None, &[], &["nts"]),
    row("nwy", "Norway", Coastal, Supply, None, &[], &[]),
    row("par", "Paris", Inland, Time, Some(France), &[], &[]),
    row("pic", "Picardy", Coastal, Plain, None, &[], &[]),
    row("pie", "Piedmont", Coastal, Plain, None, &[], &[]),
    row("por", "Portugal", Coastal, Supply, None, &[], &[]),
    row("pru", "Prussia", Coastal, Plain, None, &[], &[]),
    row("rom", "Rome", Coastal, Time, Some(Italy), &[], &["rme"]),
    row("ruh", "Ruhr", Inland, Plain, None, &[], &["rhr"]),
    row("rum", "Rumania", Coastal, Supply, None, &[], &["rma"]),
    row("ser", "Serbia", Inland, Supply, None, &[], &[]),
    row("sev", "Sevastopol", Coastal, Supply, Some(Russia), &[], &[]),
    row("sil", "Silesia", Inland, Plain, None, &[], &[]),
    row("ska", "Skagerrak", Sea, Plain, None, &[], &["skg"]),
    row("smy", "Smyrna", Coastal, Supply, Some(Turkey), &[], &[]),
    row("spa", "Spain", Coastal, Supply, None, &[NC, SC], &[]),
    row("stp", "St. Petersburg", Coastal, Supply, Some(Russia), &[NC, SC], &[]),
    row("swe", "Sweden", Coastal, Supply, None, &[], &[]),
    row("syr", "Syria", Coastal, Plain, None, &[], &[]),
    row("tri", "Trieste", Coastal, Supply, Some(Austria), &[], &[]),
    row("tun", "Tunisia", Coastal, Supply, None, &[], &[]),
    row("tus", "Tuscany", Coastal, Plain, None, &[], &[]),
    row("tyr", "Tyrolia", Inland, Plain, None, &[], &[]),
    row("tys", "Tyrrhenian Sea", Sea, Plain, None, &[], &["tyn"]),
    row("ukr", "Ukraine", Inland, Plain, None, &[], &[]),
    row("ven", "Venice", Coastal, Supply, Some(Italy), &[], &[]),
    row("vie", "Vienna", Inland, Time, Some(Austria), &[], &[]),
    row("wal", "Wales", Coastal, Plain, None, &[], &[]),
    row("war", "Warsaw", Inland, Supply, Some(Russia), &[], &[]),
    row("wes", "Western Mediterranean", Sea, Plain, None, &[], &["wms"]),
    row("yor", "Yorkshire", Coastal, Plain, None, &[], &[]),
];
