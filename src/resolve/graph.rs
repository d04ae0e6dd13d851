//! Decision graph construction.
//!
//! Adjudicating a set of orders can reach back into history: a move or
//! support into an older season pulls that season's recorded orders back
//! into play, since a present action may change a past battle. The graph is
//! built over every order of every affected season, with one node per
//! decision and each node holding the order indices it depends on.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::board::{Order, Point, SeasonId, UnitId, World};

/// Identifies a decision. Unit-keyed decisions belong to that unit's order,
/// since every unit has at most one order in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecisionKey {
    IsDislodged(UnitId),
    HasPath(UnitId),
    GivesSupport(UnitId),
    HoldStrength(Point),
    AttackStrength(UnitId),
    DefendStrength(UnitId),
    PreventStrength(UnitId),
    DoesMove(UnitId),
    AdvanceTimeline(SeasonId),
}

impl DecisionKey {
    pub fn name(self) -> &'static str {
        match self {
            DecisionKey::IsDislodged(_) => "IsDislodged",
            DecisionKey::HasPath(_) => "HasPath",
            DecisionKey::GivesSupport(_) => "GivesSupport",
            DecisionKey::HoldStrength(_) => "HoldStrength",
            DecisionKey::AttackStrength(_) => "AttackStrength",
            DecisionKey::DefendStrength(_) => "DefendStrength",
            DecisionKey::PreventStrength(_) => "PreventStrength",
            DecisionKey::DoesMove(_) => "DoesMove",
            DecisionKey::AdvanceTimeline(_) => "AdvanceTimeline",
        }
    }

    pub fn is_binary(self) -> bool {
        !matches!(
            self,
            DecisionKey::HoldStrength(_)
                | DecisionKey::AttackStrength(_)
                | DecisionKey::DefendStrength(_)
                | DecisionKey::PreventStrength(_)
        )
    }
}

impl fmt::Display for DecisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecisionKey::HoldStrength(p) => {
                write!(f, "{}({}@#{})", self.name(), p.province, p.season.index())
            }
            DecisionKey::AdvanceTimeline(s) => write!(f, "{}(#{})", self.name(), s.index()),
            DecisionKey::IsDislodged(u)
            | DecisionKey::HasPath(u)
            | DecisionKey::GivesSupport(u)
            | DecisionKey::AttackStrength(u)
            | DecisionKey::DefendStrength(u)
            | DecisionKey::PreventStrength(u)
            | DecisionKey::DoesMove(u) => write!(f, "{}(#{})", self.name(), u.index()),
        }
    }
}

/// A decision and the orders it reads. Fields are indices into
/// [`DecisionGraph::orders`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    IsDislodged {
        order: usize,
        incoming: Vec<usize>,
    },
    HasPath {
        order: usize,
        /// Convoy orders naming exactly this move.
        convoys: Vec<usize>,
    },
    GivesSupport {
        order: usize,
        cuts: Vec<usize>,
    },
    HoldStrength {
        point: Point,
        occupant: Option<usize>,
        supports: Vec<usize>,
    },
    AttackStrength {
        order: usize,
        supports: Vec<usize>,
        opposing: Option<usize>,
    },
    DefendStrength {
        order: usize,
        supports: Vec<usize>,
    },
    PreventStrength {
        order: usize,
        supports: Vec<usize>,
        opposing: Option<usize>,
    },
    DoesMove {
        order: usize,
        opposing: Option<usize>,
        competing: Vec<usize>,
    },
    AdvanceTimeline {
        season: SeasonId,
        /// Orders to units standing in the season.
        orders: Vec<usize>,
        /// Moves ending in the season.
        arrivals: Vec<usize>,
    },
}

/// Every decision for one adjudication and the orders they are made over.
#[derive(Debug, Clone)]
pub struct DecisionGraph {
    orders: Vec<Order>,
    by_unit: BTreeMap<UnitId, usize>,
    seasons: Vec<SeasonId>,
    keys: Vec<DecisionKey>,
    decisions: Vec<Decision>,
    index: BTreeMap<DecisionKey, usize>,
}

impl DecisionGraph {
    /// Builds the graph for `orders`, which must already be validated.
    pub fn build(world: &World, orders: &[Order]) -> DecisionGraph {
        let mut graph = DecisionGraph {
            orders: Vec::new(),
            by_unit: BTreeMap::new(),
            seasons: Vec::new(),
            keys: Vec::new(),
            decisions: Vec::new(),
            index: BTreeMap::new(),
        };
        for order in orders {
            graph.add_order(*order);
        }
        graph.collect_history(world);
        graph.fill_holds(world);
        graph.wire(world);
        tracing::debug!(
            orders = graph.orders.len(),
            seasons = graph.seasons.len(),
            decisions = graph.decisions.len(),
            "built decision graph"
        );
        graph
    }

    fn add_order(&mut self, order: Order) -> bool {
        let Some(unit) = order.unit() else {
            return false;
        };
        if self.by_unit.contains_key(&unit) {
            return false;
        }
        self.by_unit.insert(unit, self.orders.len());
        self.orders.push(order);
        true
    }

    /// Finds the affected seasons and pulls in their recorded orders.
    ///
    /// A pulled season brings back its own orders and every recorded order
    /// from elsewhere that reached into it; the seasons of those outside
    /// units are pulled in turn. Recorded moves also pull their destination.
    fn collect_history(&mut self, world: &World) {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::new();
        let mut visit = |season: SeasonId, queue: &mut VecDeque<SeasonId>| {
            if found.insert(season) {
                queue.push_back(season);
            }
        };

        for order in &self.orders {
            if let Some(unit) = order.unit() {
                visit(world.unit(unit).season, &mut queue);
            }
            match *order {
                Order::Move { season, .. } | Order::SupportMove { season, .. } => {
                    visit(season, &mut queue)
                }
                Order::SupportHold { target, .. } => visit(world.unit(target).season, &mut queue),
                _ => {}
            }
        }

        let reaching = reaching_orders(world);
        while let Some(season) = queue.pop_front() {
            self.seasons.push(season);
            let own = world.history(season).into_iter().flat_map(|h| h.orders());
            let from_elsewhere = reaching.get(&season).into_iter().flatten();
            for order in own.chain(from_elsewhere).copied().collect::<Vec<_>>() {
                if !self.add_order(order) {
                    continue;
                }
                if let Some(unit) = order.unit() {
                    visit(world.unit(unit).season, &mut queue);
                }
                if let Order::Move { season: dest, .. } = order {
                    visit(dest, &mut queue);
                }
            }
        }
        self.seasons.sort();
    }

    /// Units standing in an affected season without an order hold.
    fn fill_holds(&mut self, world: &World) {
        for season in self.seasons.clone() {
            let idle: Vec<Order> = world
                .units_in(season)
                .filter(|u| !self.by_unit.contains_key(&u.id))
                .filter(|u| !world.retreats().iter().any(|r| r.unit == u.id))
                .map(|u| Order::Hold { power: u.power, unit: u.id })
                .collect();
            for hold in idle {
                self.add_order(hold);
            }
        }
    }

    fn wire(&mut self, world: &World) {
        let orders = self.orders.clone();
        let moves: Vec<usize> = (0..orders.len()).filter(|&i| orders[i].is_move()).collect();
        let mut holds: BTreeMap<Point, (Option<usize>, Vec<usize>)> = BTreeMap::new();

        for (i, order) in orders.iter().enumerate() {
            let Some(id) = order.unit() else {
                continue;
            };
            let unit = world.unit(id);
            let incoming: Vec<usize> = moves
                .iter()
                .copied()
                .filter(|&j| order.is_incoming(&orders[j], world))
                .collect();
            holds.entry(unit.point()).or_default().0 = Some(i);

            match *order {
                Order::Move { dest, season, .. } => {
                    let supports: Vec<usize> = (0..orders.len())
                        .filter(|&j| orders[j].is_support_for(order))
                        .collect();
                    let opposing = moves.iter().copied().find(|&j| orders[j].is_opposing(order, world));
                    let competing: Vec<usize> =
                        moves.iter().copied().filter(|&j| order.is_competing(&orders[j])).collect();
                    let convoys: Vec<usize> = (0..orders.len())
                        .filter(|&j| {
                            matches!(orders[j], Order::Convoy { target, dest: d, season: s, .. }
                                if target == id && d == dest && s == season)
                        })
                        .collect();
                    self.push(DecisionKey::HasPath(id), Decision::HasPath { order: i, convoys });
                    self.push(
                        DecisionKey::AttackStrength(id),
                        Decision::AttackStrength { order: i, supports: supports.clone(), opposing },
                    );
                    self.push(
                        DecisionKey::DefendStrength(id),
                        Decision::DefendStrength { order: i, supports: supports.clone() },
                    );
                    self.push(
                        DecisionKey::PreventStrength(id),
                        Decision::PreventStrength { order: i, supports, opposing },
                    );
                    self.push(
                        DecisionKey::DoesMove(id),
                        Decision::DoesMove { order: i, opposing, competing },
                    );
                    holds.entry(Point::new(dest.province, season)).or_default();
                }
                Order::SupportHold { target, .. } => {
                    let point = world.unit(target).point();
                    holds.entry(point).or_default().1.push(i);
                    self.push(
                        DecisionKey::GivesSupport(id),
                        Decision::GivesSupport { order: i, cuts: incoming.clone() },
                    );
                }
                Order::SupportMove { dest, season, .. } => {
                    let attacked = Point::new(dest.province, season);
                    let cuts: Vec<usize> = incoming
                        .iter()
                        .copied()
                        .filter(|&j| orders[j].unit().map(|u| world.unit(u).point()) != Some(attacked))
                        .collect();
                    holds.entry(attacked).or_default();
                    self.push(DecisionKey::GivesSupport(id), Decision::GivesSupport { order: i, cuts });
                }
                _ => {}
            }

            self.push(DecisionKey::IsDislodged(id), Decision::IsDislodged { order: i, incoming });
        }

        for (point, (occupant, supports)) in holds {
            self.push(
                DecisionKey::HoldStrength(point),
                Decision::HoldStrength { point, occupant, supports },
            );
        }

        for season in self.seasons.clone() {
            let here: Vec<usize> = (0..orders.len())
                .filter(|&i| orders[i].unit().is_some_and(|u| world.unit(u).season == season))
                .collect();
            let arrivals: Vec<usize> = moves
                .iter()
                .copied()
                .filter(|&j| orders[j].destination().is_some_and(|(_, s)| s == season))
                .collect();
            self.push(
                DecisionKey::AdvanceTimeline(season),
                Decision::AdvanceTimeline { season, orders: here, arrivals },
            );
        }
    }

    fn push(&mut self, key: DecisionKey, decision: Decision) {
        self.index.insert(key, self.decisions.len());
        self.keys.push(key);
        self.decisions.push(decision);
    }

    /// Submitted orders first, then recorded ones, then implied holds.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, index: usize) -> &Order {
        &self.orders[index]
    }

    pub fn order_for(&self, unit: UnitId) -> Option<&Order> {
        self.by_unit.get(&unit).map(|&i| &self.orders[i])
    }

    /// Affected seasons in creation order.
    pub fn seasons(&self) -> &[SeasonId] {
        &self.seasons
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = DecisionKey> + '_ {
        self.keys.iter().copied()
    }

    pub fn key(&self, index: usize) -> DecisionKey {
        self.keys[index]
    }

    pub fn decision(&self, index: usize) -> &Decision {
        &self.decisions[index]
    }

    pub fn find(&self, key: DecisionKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Index of the order given to the unit standing at `point`.
    pub fn occupant(&self, point: Point) -> Option<usize> {
        match self.find(DecisionKey::HoldStrength(point)).map(|i| &self.decisions[i]) {
            Some(Decision::HoldStrength { occupant, .. }) => *occupant,
            _ => None,
        }
    }
}

/// Recorded orders keyed by the other seasons they reach into: move and
/// support destinations, and the seasons of supported or convoyed units.
fn reaching_orders(world: &World) -> BTreeMap<SeasonId, Vec<Order>> {
    let mut reaching: BTreeMap<SeasonId, Vec<Order>> = BTreeMap::new();
    for (&home, history) in world.all_history() {
        for order in history.orders() {
            let mut seasons: Vec<SeasonId> = order.destination().map(|(_, s)| s).into_iter().collect();
            seasons.extend(order.target().map(|t| world.unit(t).season));
            seasons.sort();
            seasons.dedup();
            for season in seasons.into_iter().filter(|&s| s != home) {
                reaching.entry(season).or_default().push(*order);
            }
        }
    }
    reaching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Location, Province::*};

    fn mv(world: &World, from: &str, to: Location) -> Order {
        let u = world.unit_by_name(from, (0, 0)).unwrap();
        Order::Move { power: u.power, unit: u.id, dest: to, season: u.season }
    }

    #[test]
    fn move_decisions_are_wired() {
        let world = World::empty()
            .with_units(&["Germany A Mun", "Germany A Boh", "Austria A Tyr", "Italy A Ven"])
            .unwrap();
        let boh = world.unit_by_name("boh", (0, 0)).unwrap();
        let mun = world.unit_by_name("mun", (0, 0)).unwrap();
        let orders = vec![
            mv(&world, "mun", Location::land(Tyr)),
            Order::SupportMove {
                power: boh.power,
                unit: boh.id,
                target: mun.id,
                dest: Location::land(Tyr),
                season: mun.season,
            },
            mv(&world, "ven", Location::land(Tyr)),
        ];
        let graph = DecisionGraph::build(&world, &orders);
        assert_eq!(graph.orders().len(), 4, "Tyr holds implicitly");

        let i = graph.find(DecisionKey::AttackStrength(mun.id)).unwrap();
        let Decision::AttackStrength { supports, opposing, .. } = graph.decision(i) else {
            panic!("wrong decision");
        };
        assert_eq!(supports, &vec![1]);
        assert_eq!(*opposing, None);

        let i = graph.find(DecisionKey::DoesMove(mun.id)).unwrap();
        let Decision::DoesMove { competing, .. } = graph.decision(i) else {
            panic!("wrong decision");
        };
        assert_eq!(competing, &vec![2]);

        let tyr = world.unit_by_name("tyr", (0, 0)).unwrap();
        let i = graph.find(DecisionKey::HoldStrength(tyr.point())).unwrap();
        let Decision::HoldStrength { occupant, .. } = graph.decision(i) else {
            panic!("wrong decision");
        };
        assert_eq!(*occupant, Some(3));
        assert_eq!(graph.seasons(), &[world.seasons().root()]);
        assert!(graph.find(DecisionKey::AdvanceTimeline(world.seasons().root())).is_some());
    }

    #[test]
    fn support_is_not_cut_from_the_attacked_province() {
        let world = World::empty()
            .with_units(&["Germany A Mun", "Germany A Boh", "Austria A Tyr"])
            .unwrap();
        let boh = world.unit_by_name("boh", (0, 0)).unwrap();
        let mun = world.unit_by_name("mun", (0, 0)).unwrap();
        let orders = vec![
            mv(&world, "mun", Location::land(Tyr)),
            Order::SupportMove {
                power: boh.power,
                unit: boh.id,
                target: mun.id,
                dest: Location::land(Tyr),
                season: mun.season,
            },
            mv(&world, "tyr", Location::land(Boh)),
        ];
        let graph = DecisionGraph::build(&world, &orders);
        let i = graph.find(DecisionKey::GivesSupport(boh.id)).unwrap();
        assert_eq!(graph.decision(i), &Decision::GivesSupport { order: 1, cuts: vec![] });
        let i = graph.find(DecisionKey::IsDislodged(boh.id)).unwrap();
        assert_eq!(graph.decision(i), &Decision::IsDislodged { order: 1, incoming: vec![2] });
    }

    #[test]
    fn keys_display_by_kind() {
        let world = World::empty().with_units(&["Germany A Mun"]).unwrap();
        let mun = world.unit_by_name("mun", (0, 0)).unwrap();
        assert_eq!(DecisionKey::DoesMove(mun.id).to_string(), "DoesMove(#0)");
        assert!(DecisionKey::DoesMove(mun.id).is_binary());
        assert!(!DecisionKey::HoldStrength(mun.point()).is_binary());
    }
}
