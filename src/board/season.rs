//! Seasons: the nodes of the multiverse.
//!
//! A season is a `(turn, timeline)` coordinate. Seasons form an append-only
//! DAG: each season has at most one past and any number of futures. The first
//! future of a season continues its timeline; every later one forks a new
//! timeline whose id comes from the arena's own allocator.

use std::fmt;

/// The first turn number.
pub const FIRST_TURN: u32 = 0;

/// Index of a season in its [`Seasons`] arena. Ordered by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeasonId(u32);

impl SeasonId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: SeasonId,
    pub turn: u32,
    pub timeline: u32,
    pub past: Option<SeasonId>,
    futures: Vec<SeasonId>,
}

impl Season {
    /// Seasons created directly from this one, in creation order.
    pub fn futures(&self) -> &[SeasonId] {
        &self.futures
    }

    /// True if nothing has been created from this season yet.
    pub fn is_head(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn coord(&self) -> (u32, u32) {
        (self.turn, self.timeline)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.turn, self.timeline)
    }
}

/// Arena owning every season and the timeline id counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seasons {
    seasons: Vec<Season>,
    next_timeline: u32,
}

impl Default for Seasons {
    fn default() -> Self {
        Self::new()
    }
}

impl Seasons {
    /// An arena holding a single root season at turn 0 on timeline 0.
    pub fn new() -> Self {
        let mut seasons = Seasons { seasons: Vec::new(), next_timeline: 0 };
        seasons.make_root();
        seasons
    }

    /// Adds a season with no past on a fresh timeline.
    pub fn make_root(&mut self) -> SeasonId {
        let timeline = self.allocate_timeline();
        self.push(None, FIRST_TURN, timeline)
    }

    /// Continues the timeline of `past` by one turn.
    pub fn advance(&mut self, past: SeasonId) -> SeasonId {
        let (turn, timeline) = self.get(past).coord();
        self.push(Some(past), turn + 1, timeline)
    }

    /// Branches a new timeline one turn after `past`.
    pub fn fork(&mut self, past: SeasonId) -> SeasonId {
        let turn = self.get(past).turn;
        let timeline = self.allocate_timeline();
        self.push(Some(past), turn + 1, timeline)
    }

    fn allocate_timeline(&mut self) -> u32 {
        let id = self.next_timeline;
        self.next_timeline += 1;
        id
    }

    fn push(&mut self, past: Option<SeasonId>, turn: u32, timeline: u32) -> SeasonId {
        let id = SeasonId(self.seasons.len() as u32);
        self.seasons.push(Season { id, turn, timeline, past, futures: Vec::new() });
        if let Some(p) = past {
            self.seasons[p.index()].futures.push(id);
        }
        id
    }

    /// The first season ever created.
    pub fn root(&self) -> SeasonId {
        SeasonId(0)
    }

    pub fn get(&self, id: SeasonId) -> &Season {
        &self.seasons[id.index()]
    }

    pub fn find(&self, turn: u32, timeline: u32) -> Option<SeasonId> {
        self.seasons
            .iter()
            .find(|s| s.turn == turn && s.timeline == timeline)
            .map(|s| s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Season> {
        self.seasons.iter()
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Seasons at the front of their timeline.
    pub fn heads(&self) -> impl Iterator<Item = &Season> {
        self.seasons.iter().filter(|s| s.is_head())
    }

    pub fn is_head(&self, id: SeasonId) -> bool {
        self.get(id).is_head()
    }

    /// The earliest season of `id`'s timeline: walk back while the timeline
    /// stays the same.
    pub fn timeline_root(&self, id: SeasonId) -> SeasonId {
        let mut current = self.get(id);
        while let Some(past) = current.past.map(|p| self.get(p)) {
            if past.timeline != current.timeline {
                break;
            }
            current = past;
        }
        current.id
    }

    /// Timelines are adjacent to themselves, to timelines that branched off
    /// them, and to sibling timelines branched off the same season.
    pub fn in_adjacent_timeline(&self, a: SeasonId, b: SeasonId) -> bool {
        let (sa, sb) = (self.get(a), self.get(b));
        if sa.timeline == sb.timeline {
            return true;
        }
        let root_a = self.get(self.timeline_root(a));
        let root_b = self.get(self.timeline_root(b));
        root_a.past.map(|p| self.get(p).timeline) == Some(sb.timeline)
            || root_b.past.map(|p| self.get(p).timeline) == Some(sa.timeline)
            || root_a.past == root_b.past
    }

    pub fn is_turn_adjacent(&self, a: SeasonId, b: SeasonId) -> bool {
        self.get(a).turn.abs_diff(self.get(b).turn) <= 1
    }

    /// Both turn-adjacent and timeline-adjacent: the seasons a unit in `a`
    /// can reach in one step.
    pub fn is_adjacent(&self, a: SeasonId, b: SeasonId) -> bool {
        self.is_turn_adjacent(a, b) && self.in_adjacent_timeline(a, b)
    }

    /// Every other season within one turn in an adjacent timeline: the
    /// immediate past, the futures, and nearby seasons of branched and
    /// sibling timelines.
    pub fn adjacent_seasons(&self, id: SeasonId) -> Vec<SeasonId> {
        self.seasons
            .iter()
            .map(|s| s.id)
            .filter(|&other| other != id && self.is_adjacent(id, other))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trunk a0..a3, with b1 and c1 forked from a1 and d1 forked from a2.
    struct Tree {
        seasons: Seasons,
        a: [SeasonId; 4],
        b1: SeasonId,
        b2: SeasonId,
        c1: SeasonId,
        d1: SeasonId,
    }

    fn tree() -> Tree {
        let mut seasons = Seasons::new();
        let a0 = seasons.root();
        let a1 = seasons.advance(a0);
        let a2 = seasons.advance(a1);
        let a3 = seasons.advance(a2);
        let b1 = seasons.fork(a1);
        let b2 = seasons.advance(b1);
        let c1 = seasons.fork(a1);
        let d1 = seasons.fork(a2);
        Tree { seasons, a: [a0, a1, a2, a3], b1, b2, c1, d1 }
    }

    #[test]
    fn forking_allocates_timelines_in_order() {
        let t = tree();
        let s = &t.seasons;
        for a in t.a {
            assert_eq!(s.get(a).timeline, 0);
        }
        assert_eq!(s.get(t.b1).coord(), (2, 1));
        assert_eq!(s.get(t.b2).coord(), (3, 1));
        assert_eq!(s.get(t.c1).coord(), (2, 2));
        assert_eq!(s.get(t.d1).coord(), (3, 3));
        assert_eq!(s.get(t.a[1]).futures(), &[t.a[2], t.b1, t.c1]);
    }

    #[test]
    fn timeline_roots() {
        let t = tree();
        let s = &t.seasons;
        assert_eq!(s.timeline_root(t.a[0]), t.a[0]);
        assert_eq!(s.timeline_root(t.a[3]), t.a[0]);
        assert_eq!(s.timeline_root(t.b1), t.b1);
        assert_eq!(s.timeline_root(t.b2), t.b1);
        assert_eq!(s.timeline_root(t.d1), t.d1);
    }

    #[test]
    fn timeline_adjacency() {
        let t = tree();
        let s = &t.seasons;
        assert!(s.in_adjacent_timeline(t.b2, t.a[3]), "branch is adjacent to its origin");
        assert!(s.in_adjacent_timeline(t.b2, t.c1), "siblings are adjacent");
        assert!(!s.in_adjacent_timeline(t.b2, t.d1), "branches of different points are not");
        assert!(s.in_adjacent_timeline(t.d1, t.a[0]));
    }

    #[test]
    fn adjacent_seasons_cover_past_futures_and_cobranches() {
        let t = tree();
        let s = &t.seasons;
        let adj = s.adjacent_seasons(t.b1);
        assert!(adj.contains(&t.a[1]), "immediate past");
        assert!(adj.contains(&t.b2), "future");
        assert!(adj.contains(&t.c1), "sibling branch");
        assert!(adj.contains(&t.a[2]) && adj.contains(&t.a[3]), "origin timeline nearby");
        assert!(!adj.contains(&t.a[0]), "two turns back");
        assert!(!adj.contains(&t.d1), "not timeline-adjacent");
        assert!(!adj.contains(&t.b1));
    }

    #[test]
    fn lookup_and_heads() {
        let t = tree();
        let s = &t.seasons;
        assert_eq!(s.find(0, 0), Some(s.root()));
        assert_eq!(s.find(2, 1), Some(t.b1));
        assert_eq!(s.find(2, 9), None);
        let heads: Vec<String> = s.heads().map(|h| h.to_string()).collect();
        assert_eq!(heads, vec!["3:0", "3:1", "2:2", "3:3"]);
    }

    #[test]
    fn separate_arenas_count_timelines_independently() {
        let mut first = Seasons::new();
        let root = first.root();
        first.fork(root);
        let second = Seasons::new();
        assert_eq!(second.get(second.root()).timeline, 0);
        assert_eq!(first.get(first.find(1, 1).unwrap_or(root)).timeline, 1);
    }
}
