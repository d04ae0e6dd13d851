//! Per-season record of adjudicated orders.
//!
//! When a season is pulled back into adjudication, its recorded orders are
//! replayed and the fresh outcomes are compared against the cached ones. Any
//! difference means history changed and the season must fork.

use std::collections::BTreeMap;

use super::order::Order;
use super::unit::UnitId;

/// Orders given to one season's units and their cached outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHistory {
    orders: BTreeMap<UnitId, Order>,
    dislodged: BTreeMap<UnitId, bool>,
    moved: BTreeMap<UnitId, bool>,
}

impl OrderHistory {
    /// Records `order` for its unit, replacing any stale entry. `moved` is
    /// the move outcome for move orders and `None` otherwise.
    pub fn record(&mut self, unit: UnitId, order: Order, dislodged: bool, moved: Option<bool>) {
        self.orders.insert(unit, order);
        self.dislodged.insert(unit, dislodged);
        match moved {
            Some(m) => {
                self.moved.insert(unit, m);
            }
            None => {
                self.moved.remove(&unit);
            }
        }
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn order_for(&self, unit: UnitId) -> Option<&Order> {
        self.orders.get(&unit)
    }

    pub fn was_dislodged(&self, unit: UnitId) -> Option<bool> {
        self.dislodged.get(&unit).copied()
    }

    /// Cached outcome of the unit's move order, if it had one.
    pub fn did_move(&self, unit: UnitId) -> Option<bool> {
        self.moved.get(&unit).copied()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
