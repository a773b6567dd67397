//! Priority-frontier search with turn penalties.
//!
//! # Algorithm
//!
//! Label-setting search keyed by `time + h(node)`:
//!
//! * With a destination, `h` is the straight-line distance to it divided by
//!   the map's highest speed limit.  No segment can be driven faster than
//!   that, and segment lengths are never shorter than the straight line
//!   between their ends, so `h` never overstates the remaining time and the
//!   search is A*.  It stops as soon as the destination is finalized.
//! * Without a destination `h = 0` and the search is Dijkstra, running until
//!   the frontier is empty.
//!
//! A popped entry that does not beat the node's recorded time is stale and
//! dropped.  Otherwise the node is finalized with that time and reaching
//! segment, and every segment that may be driven away from it is expanded.
//! Expanding onto a segment of a different street than the reaching
//! segment's street costs `turn_penalty` extra seconds; the source has no
//! reaching segment and pays no penalty.
//!
//! # State
//!
//! All per-node results live in a [`SearchState`] owned by the caller.
//! Every run resets it first, so results never leak between runs, and two
//! searches with separate states can run on different threads.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use sm_core::{IntersectionId, SegmentId};
use sm_graph::StreetMap;

// ── SearchState ───────────────────────────────────────────────────────────────

/// Per-node output of one search run.
///
/// `best_time(n)` is `None` until `n` is finalized; a node that stays `None`
/// after a run is unreachable (or, in single-destination mode, simply not
/// needed before the destination was reached).
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    best_time: Vec<Option<f64>>,
    reaching: Vec<Option<SegmentId>>,
    source: Option<IntersectionId>,
}

impl SearchState {
    /// A cleared state sized for `intersections` nodes.
    pub fn new(intersections: usize) -> Self {
        Self {
            best_time: vec![None; intersections],
            reaching: vec![None; intersections],
            source: None,
        }
    }

    pub fn for_map(map: &StreetMap) -> Self {
        Self::new(map.intersection_count())
    }

    /// Forget every result and resize to `intersections` nodes.
    pub fn reset(&mut self, intersections: usize) {
        self.best_time.clear();
        self.best_time.resize(intersections, None);
        self.reaching.clear();
        self.reaching.resize(intersections, None);
        self.source = None;
    }

    /// Source of the last run, `None` before the first run.
    pub fn source(&self) -> Option<IntersectionId> {
        self.source
    }

    /// Finalized shortest time to `node`, in seconds.
    #[inline]
    pub fn best_time(&self, node: IntersectionId) -> Option<f64> {
        self.best_time.get(node.index()).copied().flatten()
    }

    /// Segment that achieved [`best_time`](Self::best_time).  `None` for the
    /// source and for unreached nodes.
    #[inline]
    pub fn reaching_edge(&self, node: IntersectionId) -> Option<SegmentId> {
        self.reaching.get(node.index()).copied().flatten()
    }

    #[inline]
    pub fn is_finalized(&self, node: IntersectionId) -> bool {
        self.best_time(node).is_some()
    }

    pub fn finalized_count(&self) -> usize {
        self.best_time.iter().filter(|t| t.is_some()).count()
    }

    #[inline]
    fn finalize(&mut self, node: IntersectionId, time: f64, via: Option<SegmentId>) {
        self.best_time[node.index()] = Some(time);
        self.reaching[node.index()] = via;
    }
}

// ── Frontier ──────────────────────────────────────────────────────────────────

/// Candidate label waiting in the frontier.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    key: f64,
    time: f64,
    node: IntersectionId,
    via: Option<SegmentId>,
}

impl Ord for FrontierEntry {
    /// Reversed so `BinaryHeap` pops the smallest key.  Ties fall back to
    /// time, then ids, which keeps runs deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.time.total_cmp(&self.time))
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.via.cmp(&self.via))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

// ── Search ────────────────────────────────────────────────────────────────────

/// Run one search from `source` into a fresh [`SearchState`].
///
/// `destination = Some(d)` enables the straight-line heuristic and the early
/// exit at `d`; `None` finalizes every reachable node.
///
/// # Panics
///
/// Panics if `source` or `destination` is not an intersection of `map`.
pub fn search(
    map: &StreetMap,
    source: IntersectionId,
    destination: Option<IntersectionId>,
    turn_penalty: f64,
) -> SearchState {
    let mut state = SearchState::for_map(map);
    search_into(map, &mut state, source, destination, turn_penalty);
    state
}

/// Like [`search`] but reuses `state`, which is reset first.
pub fn search_into(
    map: &StreetMap,
    state: &mut SearchState,
    source: IntersectionId,
    destination: Option<IntersectionId>,
    turn_penalty: f64,
) {
    debug_assert!(turn_penalty >= 0.0, "negative turn penalty breaks label ordering");

    state.reset(map.intersection_count());
    state.source = Some(source);

    let max_speed = map.max_speed_limit();
    let heuristic = |node: IntersectionId| match destination {
        Some(dest) if max_speed > 0.0 => map.straight_line_m(node, dest) / max_speed,
        _ => 0.0,
    };

    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEntry { key: heuristic(source), time: 0.0, node: source, via: None });

    let mut popped = 0usize;
    while let Some(entry) = frontier.pop() {
        popped += 1;
        let node = entry.node;

        if state.best_time(node).is_some_and(|best| entry.time >= best) {
            continue;
        }
        state.finalize(node, entry.time, entry.via);

        if destination == Some(node) {
            debug!(%source, %node, time = entry.time, popped, "destination reached");
            return;
        }

        let arriving_street = entry.via.map(|seg| map.street_of(seg));

        for &seg_id in map.segments_of(node) {
            let seg = map.segment(seg_id);
            if !seg.can_leave(node) {
                continue;
            }
            let next = seg.other_end(node);
            if state.is_finalized(next) {
                continue;
            }

            let mut time = entry.time + seg.travel_time_secs;
            if arriving_street.is_some_and(|street| street != seg.street) {
                time += turn_penalty;
            }
            frontier.push(FrontierEntry { key: time + heuristic(next), time, node: next, via: Some(seg_id) });
        }
    }

    debug!(
        %source,
        finalized = state.finalized_count(),
        popped,
        "frontier exhausted"
    );
}
