//! Legal order generation.
//!
//! Generates the legal movement-phase orders for each orderable unit of a
//! power across every timeline head.

pub mod movement;

use rand::Rng;

use crate::board::{Order, Power, World};

pub use movement::legal_orders;

/// Picks one random legal order for each of the power's orderable units.
pub fn random_orders(world: &World, power: Power, rng: &mut impl Rng) -> Vec<Order> {
    let mut orders = Vec::new();

    for unit in world.orderable_units().filter(|u| u.power == power) {
        let legal = legal_orders(world, unit.id);
        if !legal.is_empty() {
            let idx = rng.gen_range(0..legal.len());
            orders.push(legal[idx]);
        }
    }

    orders
}

/// Random orders for every power of the world.
pub fn random_orders_all(world: &World, rng: &mut impl Rng) -> Vec<Order> {
    world
        .powers()
        .iter()
        .flat_map(|&power| random_orders(world, power, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn one_order_per_unit() {
        let world = World::standard();
        let mut rng = SmallRng::seed_from_u64(7);
        let orders = random_orders(&world, Power::Russia, &mut rng);
        assert_eq!(orders.len(), 4);
        assert!(orders.iter().all(|o| o.power() == Power::Russia));
        assert_eq!(random_orders_all(&world, &mut rng).len(), 22);
    }

    #[test]
    fn same_seed_same_orders() {
        let world = World::standard();
        let a = random_orders_all(&world, &mut SmallRng::seed_from_u64(42));
        let b = random_orders_all(&world, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
