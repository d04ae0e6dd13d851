//! Scenario builder shared by the integration tests.
//!
//! A scenario starts from the standard map with a few units at 0:0, takes
//! orders in notation, and plays them one phase at a time.

#![allow(dead_code)]

use chronopolitik::board::{Order, SeasonId, Unit, UnitId, World};
use chronopolitik::protocol::parse_order;
use chronopolitik::resolve::{
    adjudicate_orders, valid_orders, validate_orders, Adjudication, OrderValidation, Phase,
    run_phase, update_world,
};

pub struct Scenario {
    pub world: World,
    pub orders: Vec<Order>,
}

impl Scenario {
    /// Standard map, no units except `units` (e.g. `"Germany A Mun"`) at 0:0.
    pub fn new(units: &[&str]) -> Self {
        let world = World::empty().with_units(units).expect("bad unit spec");
        Scenario { world, orders: Vec::new() }
    }

    pub fn from_world(world: World) -> Self {
        Scenario { world, orders: Vec::new() }
    }

    /// Queues one order, e.g. `"Germany A Mun@1:0 - Tyr@0:0"`.
    pub fn order(&mut self, text: &str) -> Order {
        let order = parse_order(&self.world, text)
            .unwrap_or_else(|e| panic!("cannot parse {text:?}: {e}"));
        self.orders.push(order);
        order
    }

    pub fn orders(&mut self, texts: &[&str]) -> &mut Self {
        for text in texts {
            self.order(text);
        }
        self
    }

    /// Validates the queued orders without consuming them.
    pub fn validate(&self) -> Vec<OrderValidation> {
        validate_orders(&self.world, &self.orders)
    }

    /// Validation result for one queued order.
    pub fn validation(&self, order: &Order) -> OrderValidation {
        self.validate()
            .into_iter()
            .find(|v| !v.implicit && v.order == *order)
            .unwrap_or_else(|| panic!("no validation for {order:?}"))
    }

    /// Validates and adjudicates the queued orders without applying them.
    pub fn adjudicate(&self) -> Adjudication {
        let validations = self.validate();
        adjudicate_orders(&self.world, &valid_orders(&validations)).expect("adjudication failed")
    }

    /// Plays the queued orders, moves the scenario to the resulting world,
    /// and returns the phase.
    pub fn execute(&mut self) -> Phase {
        let orders = std::mem::take(&mut self.orders);
        let phase = run_phase(&self.world, &orders).expect("phase failed");
        self.world = phase.world.clone();
        phase
    }

    /// Applies an adjudication computed earlier with [`Scenario::adjudicate`].
    pub fn apply(&mut self, adjudication: &Adjudication) -> World {
        self.orders.clear();
        let next = update_world(&self.world, adjudication).expect("update failed");
        self.world = next.clone();
        next
    }

    pub fn season(&self, turn: u32, timeline: u32) -> SeasonId {
        self.world.season(turn, timeline).expect("no such season")
    }

    pub fn unit(&self, province: &str, coord: (u32, u32)) -> &Unit {
        self.world
            .unit_by_name(province, coord)
            .unwrap_or_else(|e| panic!("no unit in {province}@{coord:?}: {e}"))
    }

    pub fn id(&self, province: &str, coord: (u32, u32)) -> UnitId {
        self.unit(province, coord).id
    }

    /// Number of seasons whose past is `season`.
    pub fn futures(&self, coord: (u32, u32)) -> usize {
        let id = self.season(coord.0, coord.1);
        self.world.season_info(id).futures().len()
    }
}
