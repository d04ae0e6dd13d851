//! The multiversal game model.
//!
//! Provinces and the location graph of the standard map, seasons and their
//! timelines, unit lineages, orders, per-season history, and the immutable
//! world snapshot tying them together.

pub mod history;
pub mod map;
pub mod options;
pub mod order;
pub mod province;
pub mod season;
pub mod unit;
pub mod world;

pub use history::OrderHistory;
pub use map::{Location, LocationKind, Map, MapError};
pub use options::GameOptions;
pub use order::{Order, OrderKind};
pub use province::{Coast, Power, Province, Terrain, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT};
pub use season::{Season, SeasonId, Seasons, FIRST_TURN};
pub use unit::{Point, Unit, UnitId, UnitType};
pub use world::{RetreatingUnit, World, WorldError};
