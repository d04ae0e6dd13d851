//! The movement-phase resolver.
//!
//! Every decision is attempted in turn, and each attempt first attempts the
//! decisions it depends on. Binary decisions are set at most once and
//! numeric ranges only narrow, so repeated sweeps converge. Sweeping stops
//! once a full pass changes nothing. A decision already being worked on
//! further up the stack is read at its current value rather than re-entered.
//!
//! Two stalls are broken by rule when no sweep makes progress: a ring of
//! three or more moves that each vacate the next one's destination all
//! succeed, and a convoy whose route depends on its own outcome fails.
//! Anything still open after that is an [`EngineError`].

use std::collections::HashSet;
use std::fmt;

use crate::board::{Order, Point, Power, SeasonId, UnitId, World};

use super::decision::{Binary, EngineError, Numeric, Value};
use super::graph::{Decision, DecisionGraph, DecisionKey};
use super::log::{DecisionLog, TracingLog};
use super::pathfind::convoy_search;

/// Resolved decisions for one set of orders.
#[derive(Debug, Clone)]
pub struct Adjudication {
    graph: DecisionGraph,
    values: Vec<Value>,
}

impl Adjudication {
    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn value(&self, key: DecisionKey) -> Option<Value> {
        self.graph.find(key).map(|i| self.values[i])
    }

    pub fn outcome(&self, key: DecisionKey) -> Option<bool> {
        self.value(key).and_then(Value::outcome)
    }

    pub fn strength(&self, key: DecisionKey) -> Option<(u8, u8)> {
        self.value(key).and_then(Value::strength).map(Numeric::range)
    }

    pub fn is_dislodged(&self, unit: UnitId) -> Option<bool> {
        self.outcome(DecisionKey::IsDislodged(unit))
    }

    pub fn does_move(&self, unit: UnitId) -> Option<bool> {
        self.outcome(DecisionKey::DoesMove(unit))
    }

    pub fn gives_support(&self, unit: UnitId) -> Option<bool> {
        self.outcome(DecisionKey::GivesSupport(unit))
    }

    pub fn has_path(&self, unit: UnitId) -> Option<bool> {
        self.outcome(DecisionKey::HasPath(unit))
    }

    pub fn attack_strength(&self, unit: UnitId) -> Option<(u8, u8)> {
        self.strength(DecisionKey::AttackStrength(unit))
    }

    pub fn hold_strength(&self, point: Point) -> Option<(u8, u8)> {
        self.strength(DecisionKey::HoldStrength(point))
    }

    pub fn advances(&self, season: SeasonId) -> Option<bool> {
        self.outcome(DecisionKey::AdvanceTimeline(season))
    }

    /// Every decision with its final value, in graph order.
    pub fn iter(&self) -> impl Iterator<Item = (DecisionKey, Value)> + '_ {
        self.values.iter().enumerate().map(|(i, v)| (self.graph.key(i), *v))
    }
}

/// Adjudicates validated orders, tracing each step through `tracing`.
pub fn adjudicate_orders(world: &World, orders: &[Order]) -> Result<Adjudication, EngineError> {
    adjudicate_with_log(world, orders, &mut TracingLog)
}

/// Adjudicates validated orders, reporting each step to `log`.
pub fn adjudicate_with_log(
    world: &World,
    orders: &[Order],
    log: &mut dyn DecisionLog,
) -> Result<Adjudication, EngineError> {
    let graph = DecisionGraph::build(world, orders);
    let values = graph
        .keys()
        .map(|key| {
            if key.is_binary() {
                Value::Binary(Binary::default())
            } else {
                Value::Numeric(Numeric::default())
            }
        })
        .collect();
    let mut resolver = Resolver {
        world,
        graph: &graph,
        resolving: vec![false; graph.len()],
        values,
        depth: 0,
        limit: world.options().max_decision_depth,
        log,
    };
    resolver.run()?;
    let values = resolver.values;
    Ok(Adjudication { graph, values })
}

/// Renders a decision with unit and season names.
struct Describe<'a> {
    world: &'a World,
    key: DecisionKey,
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.key.name();
        match self.key {
            DecisionKey::HoldStrength(p) => {
                write!(f, "{name}({}@{})", p.province, self.world.season_info(p.season))
            }
            DecisionKey::AdvanceTimeline(s) => write!(f, "{name}({})", self.world.season_info(s)),
            DecisionKey::IsDislodged(u)
            | DecisionKey::HasPath(u)
            | DecisionKey::GivesSupport(u)
            | DecisionKey::AttackStrength(u)
            | DecisionKey::DefendStrength(u)
            | DecisionKey::PreventStrength(u)
            | DecisionKey::DoesMove(u) => {
                let unit = self.world.unit(u);
                write!(f, "{name}({}@{})", unit, self.world.season_info(unit.season))
            }
        }
    }
}

struct Resolver<'a> {
    world: &'a World,
    graph: &'a DecisionGraph,
    values: Vec<Value>,
    resolving: Vec<bool>,
    depth: usize,
    limit: usize,
    log: &'a mut dyn DecisionLog,
}

impl<'a> Resolver<'a> {
    fn run(&mut self) -> Result<(), EngineError> {
        loop {
            let mut progress = false;
            for i in 0..self.values.len() {
                if !self.values[i].is_resolved() {
                    progress |= self.resolve(i)?;
                }
            }
            if progress {
                continue;
            }
            let open: Vec<usize> =
                (0..self.values.len()).filter(|&i| !self.values[i].is_resolved()).collect();
            let Some(&first) = open.first() else {
                return Ok(());
            };
            if self.break_stall()? {
                continue;
            }
            return Err(EngineError::Unresolved {
                count: open.len(),
                first: self.describe(first).to_string(),
            });
        }
    }

    fn describe(&self, i: usize) -> Describe<'a> {
        Describe { world: self.world, key: self.graph.key(i) }
    }

    /// Attempts one decision. Returns whether any decision changed.
    fn resolve(&mut self, i: usize) -> Result<bool, EngineError> {
        if self.values[i].is_resolved() || self.resolving[i] {
            return Ok(false);
        }
        if self.depth >= self.limit {
            return Err(EngineError::TooDeep {
                limit: self.limit,
                decision: self.describe(i).to_string(),
            });
        }
        self.log.log(self.depth, format_args!("{}", self.describe(i)));
        self.resolving[i] = true;
        self.depth += 1;
        let graph = self.graph;
        let result = match graph.decision(i) {
            Decision::IsDislodged { order, incoming } => self.is_dislodged(i, *order, incoming),
            Decision::HasPath { order, convoys } => self.has_path(i, *order, convoys),
            Decision::GivesSupport { order, cuts } => self.gives_support(i, *order, cuts),
            Decision::HoldStrength { occupant, supports, .. } => {
                self.hold_strength(i, *occupant, supports)
            }
            Decision::AttackStrength { order, supports, opposing } => {
                self.attack_strength(i, *order, supports, *opposing)
            }
            Decision::DefendStrength { supports, .. } => {
                let mut progress = false;
                let (min, max) = self.support_range(supports, None, None, &mut progress)?;
                Ok(progress | self.set_numeric(i, min, max)?)
            }
            Decision::PreventStrength { order, supports, opposing } => {
                self.prevent_strength(i, *order, supports, *opposing)
            }
            Decision::DoesMove { order, opposing, competing } => {
                self.does_move(i, *order, *opposing, competing)
            }
            Decision::AdvanceTimeline { season, orders, arrivals } => {
                self.advance_timeline(i, *season, orders, arrivals)
            }
        };
        self.depth -= 1;
        self.resolving[i] = false;
        result
    }

    /// Attempts the decision `key` and returns its index.
    fn dep(&mut self, key: DecisionKey, progress: &mut bool) -> Result<usize, EngineError> {
        let i = self
            .graph
            .find(key)
            .ok_or_else(|| EngineError::MissingDecision(key.to_string()))?;
        *progress |= self.resolve(i)?;
        Ok(i)
    }

    fn outcome(&self, i: usize) -> Option<bool> {
        self.values[i].outcome()
    }

    fn numeric(&self, i: usize) -> Numeric {
        self.values[i].strength().unwrap_or_default()
    }

    fn set_outcome(&mut self, i: usize, outcome: bool) -> Result<bool, EngineError> {
        let changed = match &mut self.values[i] {
            Value::Binary(b) => b.update(outcome),
            Value::Numeric(_) => Err(EngineError::MissingDecision(self.graph.key(i).to_string())),
        }
        .map_err(|e| self.in_decision(i, e))?;
        if changed {
            self.log.log(self.depth, format_args!("{} = {}", self.describe(i), outcome));
        }
        Ok(changed)
    }

    fn set_numeric(&mut self, i: usize, min: u8, max: u8) -> Result<bool, EngineError> {
        let changed = match &mut self.values[i] {
            Value::Numeric(n) => n.update(min, max),
            Value::Binary(_) => Err(EngineError::MissingDecision(self.graph.key(i).to_string())),
        }
        .map_err(|e| self.in_decision(i, e))?;
        if changed {
            self.log.log(self.depth, format_args!("{} = [{},{}]", self.describe(i), min, max));
        }
        Ok(changed)
    }

    fn in_decision(&self, i: usize, source: EngineError) -> EngineError {
        EngineError::InDecision { decision: self.describe(i).to_string(), source: Box::new(source) }
    }

    fn unit_of(&self, order: usize) -> Result<UnitId, EngineError> {
        let order = self.graph.order(order);
        order.unit().ok_or_else(|| EngineError::MissingDecision(format!("unit of {order:?}")))
    }

    fn power_of(&self, order: usize) -> Result<Power, EngineError> {
        Ok(self.world.unit(self.unit_of(order)?).power)
    }

    /// `1 + supports` as a range: confirmed supports raise the minimum and
    /// undecided ones the maximum. Supports from `min_skip` do not count
    /// towards the minimum, nor those from `max_skip` towards the maximum.
    fn support_range(
        &mut self,
        supports: &[usize],
        min_skip: Option<Power>,
        max_skip: Option<Power>,
        progress: &mut bool,
    ) -> Result<(u8, u8), EngineError> {
        let (mut min, mut max) = (1u8, 1u8);
        for &s in supports {
            let power = self.power_of(s)?;
            if min_skip == Some(power) && max_skip == Some(power) {
                continue;
            }
            let g = self.dep(DecisionKey::GivesSupport(self.unit_of(s)?), progress)?;
            let given = self.outcome(g);
            if given == Some(true) && min_skip != Some(power) {
                min += 1;
            }
            if given != Some(false) && max_skip != Some(power) {
                max += 1;
            }
        }
        Ok((min, max))
    }

    fn is_dislodged(&mut self, i: usize, order: usize, incoming: &[usize]) -> Result<bool, EngineError> {
        let mut progress = false;
        let unit = self.unit_of(order)?;

        // A unit that moves away cannot be dislodged.
        if self.graph.order(order).is_move() {
            let m = self.dep(DecisionKey::DoesMove(unit), &mut progress)?;
            match self.outcome(m) {
                Some(true) => return Ok(progress | self.set_outcome(i, false)?),
                None => return Ok(progress),
                Some(false) => {}
            }
        }

        let mut contested = false;
        for &attack in incoming {
            let m = self.dep(DecisionKey::DoesMove(self.unit_of(attack)?), &mut progress)?;
            match self.outcome(m) {
                Some(true) => return Ok(progress | self.set_outcome(i, true)?),
                None => contested = true,
                Some(false) => {}
            }
        }
        if !contested {
            progress |= self.set_outcome(i, false)?;
        }
        Ok(progress)
    }

    fn has_path(&mut self, i: usize, order: usize, convoys: &[usize]) -> Result<bool, EngineError> {
        let mut progress = false;
        let Order::Move { unit, dest, season, .. } = *self.graph.order(order) else {
            return self.set_outcome(i, false);
        };
        let world = self.world;
        let mover = world.unit(unit);
        if mover.location.borders_with(dest) && world.seasons().is_adjacent(mover.season, season) {
            return self.set_outcome(i, true);
        }

        let mut afloat = HashSet::new();
        let mut possible = HashSet::new();
        for &c in convoys {
            let fleet = self.unit_of(c)?;
            let d = self.dep(DecisionKey::IsDislodged(fleet), &mut progress)?;
            match self.outcome(d) {
                Some(false) => {
                    afloat.insert(fleet);
                    possible.insert(fleet);
                }
                None => {
                    possible.insert(fleet);
                }
                Some(true) => {}
            }
        }

        if convoy_search(world, mover, dest, season, |f| afloat.contains(&f.id)) {
            progress |= self.set_outcome(i, true)?;
        } else if !convoy_search(world, mover, dest, season, |f| possible.contains(&f.id)) {
            progress |= self.set_outcome(i, false)?;
        }
        Ok(progress)
    }

    fn gives_support(&mut self, i: usize, order: usize, cuts: &[usize]) -> Result<bool, EngineError> {
        let mut progress = false;

        let mut may_cut = false;
        for &cut in cuts {
            let a = self.dep(DecisionKey::AttackStrength(self.unit_of(cut)?), &mut progress)?;
            let attack = self.numeric(a);
            if attack.min() > 0 {
                return Ok(progress | self.set_outcome(i, false)?);
            }
            if attack.max() > 0 {
                may_cut = true;
            }
        }

        let d = self.dep(DecisionKey::IsDislodged(self.unit_of(order)?), &mut progress)?;
        match self.outcome(d) {
            Some(true) => progress |= self.set_outcome(i, false)?,
            Some(false) if !may_cut => progress |= self.set_outcome(i, true)?,
            _ => {}
        }
        Ok(progress)
    }

    fn hold_strength(
        &mut self,
        i: usize,
        occupant: Option<usize>,
        supports: &[usize],
    ) -> Result<bool, EngineError> {
        let mut progress = false;
        let Some(order) = occupant else {
            return self.set_numeric(i, 0, 0);
        };

        if self.graph.order(order).is_move() {
            let m = self.dep(DecisionKey::DoesMove(self.unit_of(order)?), &mut progress)?;
            let (min, max) = match self.outcome(m) {
                None => (0, 1),
                Some(true) => (0, 0),
                Some(false) => (1, 1),
            };
            return Ok(progress | self.set_numeric(i, min, max)?);
        }

        let (min, max) = self.support_range(supports, None, None, &mut progress)?;
        Ok(progress | self.set_numeric(i, min, max)?)
    }

    fn attack_strength(
        &mut self,
        i: usize,
        order: usize,
        supports: &[usize],
        opposing: Option<usize>,
    ) -> Result<bool, EngineError> {
        let mut progress = false;
        let unit = self.unit_of(order)?;
        let p = self.dep(DecisionKey::HasPath(unit), &mut progress)?;
        if self.outcome(p) == Some(false) {
            return Ok(progress | self.set_numeric(i, 0, 0)?);
        }

        let Some(dest) = self.graph.order(order).dest_point() else {
            return Ok(progress | self.set_numeric(i, 0, 0)?);
        };
        let occupant = self.graph.occupant(dest);
        let mut leaving = None;
        if let Some(o) = occupant.filter(|&o| self.graph.order(o).is_move()) {
            leaving = Some(self.dep(DecisionKey::DoesMove(self.unit_of(o)?), &mut progress)?);
        }
        let leaves = leaving.map(|m| self.outcome(m));
        let own = self.power_of(order)?;

        let (min, max) = match occupant {
            // The occupant stays: it must be dislodged.
            Some(o) if opposing.is_some() || matches!(leaves, None | Some(Some(false))) => {
                let defender = self.power_of(o)?;
                if defender == own {
                    (0, 0)
                } else {
                    let skip = Some(defender);
                    self.support_range(supports, skip, skip, &mut progress)?
                }
            }
            // Undecided: the minimum assumes it stays, the maximum that it leaves.
            Some(o) if leaves == Some(None) => {
                let defender = self.power_of(o)?;
                let (min, max) = self.support_range(supports, Some(defender), None, &mut progress)?;
                (if defender == own { 0 } else { min }, max)
            }
            _ => self.support_range(supports, None, None, &mut progress)?,
        };
        // A convoy still in doubt could yet drop this to zero.
        let min = if self.outcome(p).is_none() { 0 } else { min };
        Ok(progress | self.set_numeric(i, min, max)?)
    }

    fn prevent_strength(
        &mut self,
        i: usize,
        order: usize,
        supports: &[usize],
        opposing: Option<usize>,
    ) -> Result<bool, EngineError> {
        let mut progress = false;
        let p = self.dep(DecisionKey::HasPath(self.unit_of(order)?), &mut progress)?;
        if self.outcome(p) == Some(false) {
            return Ok(progress | self.set_numeric(i, 0, 0)?);
        }

        let mut opponent = None;
        if let Some(o) = opposing {
            let m = self.dep(DecisionKey::DoesMove(self.unit_of(o)?), &mut progress)?;
            if self.outcome(m) == Some(true) {
                return Ok(progress | self.set_numeric(i, 0, 0)?);
            }
            opponent = Some(m);
        }

        let (mut min, max) = self.support_range(supports, None, None, &mut progress)?;
        // Either gate could still drop this to zero.
        if self.outcome(p).is_none() || opponent.is_some_and(|m| self.outcome(m).is_none()) {
            min = 0;
        }
        Ok(progress | self.set_numeric(i, min, max)?)
    }

    fn does_move(
        &mut self,
        i: usize,
        order: usize,
        opposing: Option<usize>,
        competing: &[usize],
    ) -> Result<bool, EngineError> {
        let mut progress = false;
        let unit = self.unit_of(order)?;
        let a = self.dep(DecisionKey::AttackStrength(unit), &mut progress)?;

        // Head-to-head, the opposing defence; otherwise the destination's hold.
        let defense_key = match opposing {
            Some(o) => DecisionKey::DefendStrength(self.unit_of(o)?),
            None => match self.graph.order(order).dest_point() {
                Some(point) => DecisionKey::HoldStrength(point),
                None => return Ok(progress | self.set_outcome(i, false)?),
            },
        };
        let d = self.dep(defense_key, &mut progress)?;

        let attack = self.numeric(a);
        let defense = self.numeric(d);
        if attack.max() <= defense.min() {
            return Ok(progress | self.set_outcome(i, false)?);
        }

        let mut beats_all = true;
        for &other in competing {
            let p = self.dep(DecisionKey::PreventStrength(self.unit_of(other)?), &mut progress)?;
            let prevent = self.numeric(p);
            let attack = self.numeric(a);
            if attack.max() <= prevent.min() {
                return Ok(progress | self.set_outcome(i, false)?);
            }
            if attack.min() <= prevent.max() {
                beats_all = false;
            }
        }

        let attack = self.numeric(a);
        let defense = self.numeric(d);
        if beats_all && attack.min() > defense.max() {
            progress |= self.set_outcome(i, true)?;
        }
        Ok(progress)
    }

    fn advance_timeline(
        &mut self,
        i: usize,
        season: SeasonId,
        orders: &[usize],
        arrivals: &[usize],
    ) -> Result<bool, EngineError> {
        let mut progress = false;
        let world = self.world;
        if world.seasons().is_head(season) {
            return self.set_outcome(i, true);
        }

        let mut pending = false;
        for &arrival in arrivals {
            if !self.is_new_arrival(arrival)? {
                continue;
            }
            let m = self.dep(DecisionKey::DoesMove(self.unit_of(arrival)?), &mut progress)?;
            match self.outcome(m) {
                Some(true) => return Ok(progress | self.set_outcome(i, true)?),
                None => pending = true,
                Some(false) => {}
            }
        }

        let history = world.history(season);
        for &order in orders {
            let unit = self.unit_of(order)?;
            let d = self.dep(DecisionKey::IsDislodged(unit), &mut progress)?;
            let cached = history.and_then(|h| h.was_dislodged(unit));
            match (self.outcome(d), cached) {
                (None, _) => pending = true,
                (Some(now), Some(then)) if now != then => {
                    return Ok(progress | self.set_outcome(i, true)?);
                }
                _ => {}
            }
            if self.graph.order(order).is_move() {
                let m = self.dep(DecisionKey::DoesMove(unit), &mut progress)?;
                let cached = history.and_then(|h| h.did_move(unit));
                match (self.outcome(m), cached) {
                    (None, _) => pending = true,
                    (Some(now), Some(then)) if now != then => {
                        return Ok(progress | self.set_outcome(i, true)?);
                    }
                    _ => {}
                }
            }
        }

        if !pending {
            progress |= self.set_outcome(i, false)?;
        }
        Ok(progress)
    }

    /// A move that history does not already record as having succeeded.
    fn is_new_arrival(&self, order: usize) -> Result<bool, EngineError> {
        let mv = self.graph.order(order);
        let unit = self.unit_of(order)?;
        let origin = self.world.unit(unit).season;
        Ok(!self.world.history(origin).is_some_and(|h| {
            h.order_for(unit) == Some(mv) && h.did_move(unit) == Some(true)
        }))
    }

    /// Applies the stall rules. Returns whether anything was decided.
    fn break_stall(&mut self) -> Result<bool, EngineError> {
        if let Some(ring) = self.find_ring() {
            self.log.log(0, format_args!("circular movement of {} units", ring.len()));
            for m in ring {
                self.set_outcome(m, true)?;
            }
            return Ok(true);
        }

        let graph = self.graph;
        let paradox = (0..self.values.len())
            .find(|&i| matches!(graph.key(i), DecisionKey::HasPath(_)) && !self.values[i].is_resolved());
        if let Some(i) = paradox {
            self.log.log(0, format_args!("convoy paradox at {}", self.describe(i)));
            return self.set_outcome(i, false);
        }
        Ok(false)
    }

    /// Finds undecided moves, three or more, each into the next one's origin.
    fn find_ring(&self) -> Option<Vec<usize>> {
        let graph = self.graph;
        for start in 0..self.values.len() {
            if !matches!(graph.key(start), DecisionKey::DoesMove(_)) || self.values[start].is_resolved() {
                continue;
            }
            let mut ring = vec![start];
            let mut current = start;
            loop {
                let Decision::DoesMove { order, .. } = graph.decision(current) else {
                    break;
                };
                let next = graph
                    .order(*order)
                    .dest_point()
                    .and_then(|p| graph.occupant(p))
                    .filter(|&o| graph.order(o).is_move())
                    .and_then(|o| self.unit_of(o).ok())
                    .and_then(|u| graph.find(DecisionKey::DoesMove(u)))
                    .filter(|&n| !self.values[n].is_resolved());
                match next {
                    Some(n) if n == start && ring.len() >= 3 => return Some(ring),
                    Some(n) if !ring.contains(&n) => {
                        ring.push(n);
                        current = n;
                    }
                    _ => break,
                }
            }
        }
        None
    }
}
