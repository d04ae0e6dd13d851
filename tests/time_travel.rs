//! Multiversal adjudication tests.
//!
//! Moves and supports that reach into other seasons, and whether the
//! timelines they touch fork or simply advance.

mod common;

use chronopolitik::board::{GameOptions, Power, Province};
use chronopolitik::resolve::ValidationReason;
use common::Scenario;

/// 3.A.1: Moving into your own past forks the timeline.
#[test]
fn mdatc_3a1_move_into_own_past_forks_timeline() {
    let mut s = Scenario::new(&["Germany A Mun"]);
    let mun0 = s.id("mun", (0, 0));
    s.order("Germany A Mun H");
    s.execute();

    let mun1 = s.id("mun", (1, 0));
    let order = s.order("Germany A Mun@1:0 - Tyr@0:0");
    assert_eq!(s.validation(&order).reason, ValidationReason::Valid);
    assert_eq!(s.adjudicate().does_move(mun1), Some(true));
    s.execute();

    let main: Vec<_> = s.world.seasons().iter().filter(|x| x.timeline == 0).collect();
    assert_eq!(main.len(), 3, "main timeline advances after the last unit left");
    let forks = s.world.seasons().iter().filter(|x| x.timeline != 0).count();
    assert_eq!(forks, 1, "the move forks the past");

    let tyr = s.unit("tyr", (1, 1));
    assert_eq!(tyr.past, Some(mun1));
    assert_eq!(s.world.unit(mun1).past, Some(mun0));
    assert_eq!(s.unit("mun", (1, 1)).past, Some(mun0), "the stay-at-home copy continues");
    assert!(s.world.unit_at(Province::Mun, s.season(2, 0)).is_none());
}

/// 3.A.2: Supporting a repelled past move forks the timeline.
#[test]
fn mdatc_3a2_support_to_repelled_past_move_forks_timeline() {
    let mut s = Scenario::new(&["Germany A Mun", "Austria A Tyr"]);
    let mun0 = s.id("mun", (0, 0));
    let tyr0 = s.id("tyr", (0, 0));
    s.orders(&["Germany A Mun - Tyr", "Austria A Tyr H"]);
    let adj = s.adjudicate();
    assert_eq!(adj.does_move(mun0), Some(false));
    assert_eq!(adj.is_dislodged(tyr0), Some(false));
    s.execute();

    let support = s.order("Germany A Mun@1:0 S A Mun@0:0 - Tyr@0:0");
    s.order("Austria A Tyr@1:0 H");
    assert_eq!(s.validation(&support).reason, ValidationReason::Valid);
    let adj = s.adjudicate();
    assert_eq!(adj.gives_support(s.id("mun", (1, 0))), Some(true));
    assert_eq!(adj.does_move(mun0), Some(true), "history is changed");
    assert_eq!(adj.is_dislodged(tyr0), Some(true));
    s.execute();

    assert_eq!(s.unit("tyr", (1, 1)).past, Some(mun0));
    assert_eq!(s.world.retreats().len(), 1);
    assert_eq!(s.world.retreats()[0].unit, tyr0);
}

/// 3.A.3: A failed move into the past does not fork the timeline.
#[test]
fn mdatc_3a3_failed_move_does_not_fork_timeline() {
    let mut s = Scenario::new(&["Germany A Mun", "Austria A Tyr"]);
    let tyr0 = s.id("tyr", (0, 0));
    s.orders(&["Germany A Mun H", "Austria A Tyr H"]);
    s.execute();

    let mun1 = s.id("mun", (1, 0));
    let order = s.order("Germany A Mun@1:0 - Tyr@0:0");
    s.order("Austria A Tyr@1:0 H");
    assert_eq!(s.validation(&order).reason, ValidationReason::Valid);
    let adj = s.adjudicate();
    assert_eq!(adj.does_move(mun1), Some(false));
    assert_eq!(adj.is_dislodged(tyr0), Some(false), "the past order is pulled in");
    s.execute();

    assert_eq!(s.futures((0, 0)), 1, "a failed move forked the timeline");
    assert_eq!(s.futures((1, 0)), 1);
    assert_eq!(s.futures((2, 0)), 0);
    assert_eq!(s.world.seasons().len(), 3);
}

/// 3.A.4: A superfluous support does not fork the timeline.
#[test]
fn mdatc_3a4_superfluous_support_does_not_fork_timeline() {
    let mut s = Scenario::new(&["Germany A Mun", "Germany A Boh"]);
    let mun0 = s.id("mun", (0, 0));
    s.orders(&["Germany A Mun - Tyr", "Germany A Boh H"]);
    assert_eq!(s.adjudicate().does_move(mun0), Some(true));
    s.execute();

    s.order("Germany A Tyr@1:0 H");
    let support = s.order("Germany A Boh@1:0 S A Mun@0:0 - Tyr@0:0");
    assert_eq!(s.validation(&support).reason, ValidationReason::Valid);
    let adj = s.adjudicate();
    assert_eq!(adj.gives_support(s.id("boh", (1, 0))), Some(true));
    assert_eq!(adj.does_move(mun0), Some(true));
    s.execute();

    assert_eq!(s.futures((0, 0)), 1, "a superfluous support forked the timeline");
    assert_eq!(s.futures((1, 0)), 1);
    assert_eq!(s.futures((2, 0)), 0);
}

/// Coordinates of the timeline heads, sorted.
fn heads(s: &Scenario) -> Vec<(u32, u32)> {
    let mut heads: Vec<_> = s.world.seasons().heads().map(|x| x.coord()).collect();
    heads.sort();
    heads
}

/// Plays the opening of 3.A.5 and 3.A.6: England moves from London 1:0 back
/// to Yorkshire 0:0, leaving heads 2:0 and 1:1.
fn two_timelines(units: &[&str]) -> Scenario {
    let mut s = Scenario::new(units);
    s.order("England A Lon H");
    s.execute();
    s.order("England A Lon@1:0 - Yor@0:0");
    s.execute();
    assert_eq!(heads(&s), vec![(1, 1), (2, 0)]);
    s
}

/// 3.A.5: Cross-timeline support between two heads does not fork either.
#[test]
fn mdatc_3a5_cross_timeline_support_does_not_fork_head() {
    let mut s = two_timelines(&["England A Lon", "Austria A Tyr", "Germany A Mun"]);

    let mv = s.order("Germany A Mun@2:0 - Tyr@2:0");
    let hold = s.order("Austria A Tyr@2:0 H");
    let support = s.order("Germany A Mun@1:1 S A Mun@2:0 - Tyr@2:0");
    s.order("Austria A Tyr@1:1 H");
    for order in [&mv, &hold, &support] {
        assert_eq!(s.validation(order).reason, ValidationReason::Valid, "{order:?}");
    }

    let adj = s.adjudicate();
    assert_eq!(adj.does_move(s.id("mun", (2, 0))), Some(true));
    assert_eq!(adj.is_dislodged(s.id("tyr", (2, 0))), Some(true));
    assert_eq!(adj.gives_support(s.id("mun", (1, 1))), Some(true));
    s.execute();

    assert_eq!(s.futures((2, 0)), 1, "cross-timeline support forked a head");
    assert_eq!(s.futures((1, 1)), 1, "cross-timeline support forked a head");
    assert_eq!(s.futures((3, 0)), 0);
    assert_eq!(s.futures((2, 1)), 0);
}

/// 3.A.6: Cutting a cross-timeline support does not fork.
#[test]
fn mdatc_3a6_cutting_cross_timeline_support_does_not_fork() {
    let mut s = two_timelines(&["England A Lon", "Austria A Tyr", "Germany A Mun"]);

    s.order("England A Yor@1:1 - Edi@0:0");
    s.execute();
    assert_eq!(heads(&s), vec![(1, 2), (2, 1), (3, 0)]);

    // Germany dislodges Austria in Tyrolia 3:0 with support from 2:1.
    s.orders(&[
        "Germany A Mun@3:0 - Tyr@3:0",
        "Austria A Tyr@3:0 H",
        "Germany A Mun@2:1 S A Mun@3:0 - Tyr@3:0",
        "Austria A Tyr@2:1 H",
        "Germany A Mun@1:2 H",
        "Austria A Tyr@1:2 H",
    ]);
    s.execute();
    assert_eq!(heads(&s), vec![(2, 2), (3, 1), (4, 0)]);
    assert_eq!(s.unit("tyr", (4, 0)).power, Power::Germany);

    // Austria cuts the support in 2:1 by attacking from 2:2.
    let mun21 = s.id("mun", (2, 1));
    s.orders(&[
        "Germany A Tyr@4:0 H",
        "Germany A Mun@3:1 H",
        "Austria A Tyr@3:1 H",
        "Germany A Mun@2:2 H",
    ]);
    let attack = s.order("Austria A Tyr@2:2 - Mun@2:1");
    assert_eq!(s.validation(&attack).reason, ValidationReason::Valid);

    let adj = s.adjudicate();
    assert_eq!(adj.does_move(s.id("tyr", (2, 2))), Some(false));
    assert_eq!(adj.is_dislodged(mun21), Some(false));
    assert_eq!(adj.gives_support(mun21), Some(false), "the support is cut");
    s.apply(&adj);

    assert_eq!(s.futures((3, 0)), 1, "a support cut forked the timeline");
    assert_eq!(s.futures((2, 1)), 1, "a support cut forked the timeline");
    assert_eq!(s.world.seasons().heads().count(), 3);
}

/// Re-adjudicating a past season keeps the supports it received from other
/// seasons, so a later unrelated attack does not undo the earlier fork.
#[test]
fn supports_from_other_seasons_survive_a_later_pull() {
    let mut s = Scenario::new(&["Germany A Mun", "Austria A Tyr", "Italy A Ven"]);
    let mun0 = s.id("mun", (0, 0));
    s.orders(&["Germany A Mun - Tyr", "Austria A Tyr H", "Italy A Ven H"]);
    s.execute();

    s.order("Germany A Mun@1:0 S A Mun@0:0 - Tyr@0:0");
    s.execute();
    assert_eq!(s.futures((0, 0)), 2);
    assert_eq!(heads(&s), vec![(1, 1), (2, 0)]);

    let ven = s.id("ven", (1, 1));
    s.order("Italy A Ven@1:1 - Tyr@0:0");
    let adj = s.adjudicate();
    assert_eq!(adj.gives_support(s.id("mun", (1, 0))), Some(true));
    assert_eq!(adj.does_move(mun0), Some(true), "the earlier support still counts");
    assert_eq!(adj.does_move(ven), Some(false));
    s.apply(&adj);

    assert_eq!(s.futures((0, 0)), 2, "a bounce in the past forked it again");
    let root = s.season(0, 0);
    assert_eq!(s.world.history(root).unwrap().did_move(mun0), Some(true));
}

/// A unit dislodged by a support from the future retreats into the fork,
/// avoiding the attacker's origin and a standoff recorded in that season.
#[test]
fn dislodged_in_the_past_retreats_into_the_fork() {
    let mut s = Scenario::new(&[
        "Germany A Mun",
        "Germany A Boh",
        "Austria A Tyr",
        "Russia A Gal",
        "Italy A Tri",
    ]);
    let tyr0 = s.id("tyr", (0, 0));
    s.orders(&[
        "Germany A Mun - Tyr",
        "Austria A Tyr H",
        "Germany A Boh H",
        "Russia A Gal - Vie",
        "Italy A Tri - Vie",
    ]);
    s.execute();
    assert!(s.world.retreats().is_empty());

    s.order("Germany A Boh@1:0 S A Mun@0:0 - Tyr@0:0");
    s.execute();
    assert_eq!(heads(&s), vec![(1, 1), (2, 0)]);

    let fork = s.season(1, 1);
    let [retreat] = s.world.retreats() else {
        panic!("expected one retreat, got {:?}", s.world.retreats());
    };
    assert_eq!(retreat.unit, tyr0);
    let mut destinations: Vec<_> =
        retreat.destinations.iter().map(|(l, season)| (l.province, *season)).collect();
    destinations.sort();
    assert_eq!(destinations, vec![(Province::Pie, fork), (Province::Ven, fork)]);
}

/// With time travel off, orders into other seasons are rejected.
#[test]
fn single_timeline_play_rejects_time_travel() {
    let mut s = Scenario::new(&["Germany A Mun"]);
    s.order("Germany A Mun H");
    s.execute();
    let world = s.world.clone().with_options(GameOptions {
        time_travel: false,
        ..Default::default()
    });
    let mut s = Scenario::from_world(world);
    let order = s.order("Germany A Mun@1:0 - Tyr@0:0");
    assert_eq!(s.validation(&order).reason, ValidationReason::UnreachableDestination);
    let phase = s.execute();
    assert_eq!(phase.world.seasons().len(), 3, "no fork without time travel");
}

/// Past units cannot be ordered.
#[test]
fn past_units_are_ineligible() {
    let mut s = Scenario::new(&["Germany A Mun"]);
    s.order("Germany A Mun H");
    s.execute();
    let order = s.order("Germany A Mun@0:0 - Tyr@0:0");
    assert_eq!(s.validation(&order).reason, ValidationReason::IneligibleForOrder);
}
