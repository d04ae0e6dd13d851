//! Properties every adjudication must have, checked over random legal order
//! sets from the move generator.

mod common;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use chronopolitik::board::{GameOptions, Order, World};
use chronopolitik::movegen::random_orders_all;
use chronopolitik::resolve::{
    adjudicate_orders, run_phase, update_world, valid_orders, validate_orders, DecisionKey,
    ValidationReason,
};
use common::Scenario;

fn single_timeline() -> World {
    World::standard().with_options(GameOptions { time_travel: false, ..Default::default() })
}

/// Plays `turns` random phases from `world`, checking `check` on each one.
fn play(mut world: World, seed: u64, turns: usize, mut check: impl FnMut(&World, &[Order])) -> World {
    let mut rng = SmallRng::seed_from_u64(seed);
    for turn in 0..turns {
        let orders = random_orders_all(&world, &mut rng);
        check(&world, &orders);
        world = run_phase(&world, &orders)
            .unwrap_or_else(|e| panic!("seed {seed} turn {turn}: {e}"))
            .world;
    }
    world
}

#[test]
fn single_timeline_games_always_reach_a_fixed_point() {
    for seed in 0..8 {
        let world = play(single_timeline(), seed, 5, |world, orders| {
            let validations = validate_orders(world, orders);
            let adj = adjudicate_orders(world, &valid_orders(&validations))
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert!(adj.iter().all(|(_, v)| v.is_resolved()), "seed {seed} left a decision open");
        });
        assert_eq!(world.seasons().len(), 6, "seed {seed} never forks");
        assert_eq!(world.seasons().heads().count(), 1);
    }
}

#[test]
fn time_travel_games_always_reach_a_fixed_point() {
    for seed in 0..6 {
        let world = play(World::standard(), seed, 4, |world, orders| {
            let validations = validate_orders(world, orders);
            let adj = adjudicate_orders(world, &valid_orders(&validations))
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert!(adj.iter().all(|(_, v)| v.is_resolved()), "seed {seed} left a decision open");
        });
        let mut timelines: Vec<u32> = world.seasons().iter().map(|x| x.timeline).collect();
        timelines.sort();
        timelines.dedup();
        let heads = world.seasons().heads().count();
        assert_eq!(heads, timelines.len(), "seed {seed}: one head per timeline");
    }
}

#[test]
fn adjudication_is_deterministic() {
    for seed in [3, 11, 27] {
        play(World::standard(), seed, 5, |world, orders| {
            let accepted = valid_orders(&validate_orders(world, orders));
            let a = adjudicate_orders(world, &accepted).unwrap();
            let b = adjudicate_orders(world, &accepted).unwrap();
            assert!(a.iter().eq(b.iter()), "seed {seed}: outcomes differ");

            let wa = update_world(world, &a).unwrap();
            let wb = update_world(world, &b).unwrap();
            assert_eq!(wa.units(), wb.units());
            assert_eq!(wa.seasons().len(), wb.seasons().len());
        });
    }
}

#[test]
fn validation_is_idempotent() {
    play(World::standard(), 5, 3, |world, orders| {
        let accepted = valid_orders(&validate_orders(world, orders));
        let again = validate_orders(world, &accepted);
        assert_eq!(again.len(), accepted.len(), "no implicit holds the second time");
        for v in &again {
            assert!(v.valid && !v.implicit, "{:?} became {}", v.order, v.reason);
            assert_eq!(v.reason, ValidationReason::Valid);
        }
    });
}

#[test]
fn bounce_symmetry() {
    for (a, b, dest) in [("Vie", "Ven", "Tyr"), ("Par", "Mar", "Bur"), ("Mos", "War", "Ukr")] {
        let units = [format!("Austria A {a}"), format!("Italy A {b}")];
        let mut s = Scenario::new(&[units[0].as_str(), units[1].as_str()]);
        s.order(&format!("Austria A {a} - {dest}"));
        s.order(&format!("Italy A {b} - {dest}"));
        let adj = s.adjudicate();
        for p in [a, b] {
            let id = s.id(p, (0, 0));
            assert_eq!(adj.does_move(id), Some(false), "{p} into {dest}");
            assert_eq!(adj.is_dislodged(id), Some(false), "{p} into {dest}");
        }
    }
}

#[test]
fn a_successful_mover_is_never_dislodged() {
    for seed in 0..4 {
        play(World::standard(), seed, 3, |world, orders| {
            let adj = adjudicate_orders(world, &valid_orders(&validate_orders(world, orders))).unwrap();
            for (key, _) in adj.iter() {
                if let DecisionKey::DoesMove(unit) = key {
                    if adj.does_move(unit) == Some(true) {
                        assert_eq!(adj.is_dislodged(unit), Some(false), "seed {seed}");
                    }
                }
            }
        });
    }
}

#[test]
fn self_support_is_rejected_regardless_of_adjacency() {
    let mut s = Scenario::new(&["Austria F Tri", "Russia A Mos"]);
    let fleet = s.order("Austria F Tri S F Tri H");
    let army = s.order("Russia A Mos S A Mos H");
    assert_eq!(s.validation(&fleet).reason, ValidationReason::NoSelfSupport);
    assert_eq!(s.validation(&army).reason, ValidationReason::NoSelfSupport);
}
