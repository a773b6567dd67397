//! Point-to-point routes and path utilities.

use tracing::debug;

use sm_core::{CoreError, IntersectionId, RoutingConfig, SegmentId};
use sm_graph::StreetMap;

use crate::search::search;
use crate::trace::trace_back;
use crate::RouteResult;

// ── Route ─────────────────────────────────────────────────────────────────────

/// Result of a point-to-point query: segments to drive in order and the
/// total time including turn penalties.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub segments: Vec<SegmentId>,
    pub travel_time_secs: f64,
}

impl Route {
    /// The zero-length route from an intersection to itself.
    pub fn trivial() -> Self {
        Self { segments: Vec::new(), travel_time_secs: 0.0 }
    }

    /// `true` if source and destination are the same intersection.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Fastest route from `from` to `to` using the A* heuristic.
///
/// Returns `Ok(None)` when `to` cannot be reached and `Ok(Some(trivial))`
/// when `from == to`.
///
/// # Errors
///
/// Unknown intersection ids or a negative/non-finite `turn_penalty`.
pub fn find_path(
    map: &StreetMap,
    from: IntersectionId,
    to: IntersectionId,
    turn_penalty: f64,
) -> RouteResult<Option<Route>> {
    check_request(map, from, to, turn_penalty)?;
    if from == to {
        return Ok(Some(Route::trivial()));
    }

    let state = search(map, from, Some(to), turn_penalty);
    let Some(travel_time_secs) = state.best_time(to) else {
        debug!(%from, %to, "no path");
        return Ok(None);
    };
    Ok(Some(Route { segments: trace_back(map, &state, to), travel_time_secs }))
}

pub(crate) fn check_request(
    map: &StreetMap,
    from: IntersectionId,
    to: IntersectionId,
    turn_penalty: f64,
) -> Result<(), CoreError> {
    map.check(from)?;
    map.check(to)?;
    RoutingConfig::with_turn_penalty(turn_penalty).validate()
}

/// Total time to drive `path`: segment travel times plus `turn_penalty` for
/// every pair of consecutive segments on different streets.
///
/// Assumes `path` is legal or empty.
pub fn path_travel_time(map: &StreetMap, path: &[SegmentId], turn_penalty: f64) -> f64 {
    let turns = path
        .windows(2)
        .filter(|w| map.street_of(w[0]) != map.street_of(w[1]))
        .count();
    path.iter().map(|&s| map.travel_time(s)).sum::<f64>() + turns as f64 * turn_penalty
}

/// Intersections visited when driving `path` from `start`, `start` included.
///
/// Returns `None` if a segment does not touch the current intersection or
/// would be driven against its one-way direction.
pub fn path_intersections(
    map: &StreetMap,
    path: &[SegmentId],
    start: IntersectionId,
) -> Option<Vec<IntersectionId>> {
    let mut nodes = Vec::with_capacity(path.len() + 1);
    nodes.push(start);
    let mut cur = start;
    for &seg_id in path {
        let seg = map.segment(seg_id);
        if !seg.can_leave(cur) {
            return None;
        }
        cur = seg.other_end(cur);
        nodes.push(cur);
    }
    Some(nodes)
}
