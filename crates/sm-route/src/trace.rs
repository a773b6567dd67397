//! Path reconstruction from a finished [`SearchState`].

use sm_core::{IntersectionId, SegmentId};
use sm_graph::StreetMap;

use crate::search::SearchState;

/// Segments from the last search's source to `destination`, in driving
/// order.
///
/// Follows reaching segments back to the source and reverses.  Returns an
/// empty list when `destination` was never finalized (no path) or is the
/// source itself.
pub fn trace_back(map: &StreetMap, state: &SearchState, destination: IntersectionId) -> Vec<SegmentId> {
    if !state.is_finalized(destination) {
        return Vec::new();
    }

    let mut path = Vec::new();
    let mut cur = destination;
    while let Some(seg) = state.reaching_edge(cur) {
        path.push(seg);
        cur = map.segment(seg).other_end(cur);
        // Reaching segments form a tree rooted at the source.
        debug_assert!(path.len() <= map.intersection_count());
    }
    path.reverse();
    path
}
