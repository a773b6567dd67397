//! Routing trait and the two search flavours behind it.
//!
//! Callers that only need point-to-point routes go through [`Router`] so the
//! search strategy can be swapped without touching them.

use sm_core::IntersectionId;
use sm_graph::StreetMap;

use crate::path::{Route, check_request, find_path};
use crate::search::search;
use crate::trace::trace_back;
use crate::RouteResult;

/// Pluggable point-to-point routing engine.
///
/// Implementations must be `Send + Sync` so one router can serve requests
/// from several threads; each call owns its own search state.
pub trait Router: Send + Sync {
    /// Fastest route from `from` to `to`, `Ok(None)` if unreachable.
    fn route(
        &self,
        map: &StreetMap,
        from: IntersectionId,
        to: IntersectionId,
        turn_penalty: f64,
    ) -> RouteResult<Option<Route>>;
}

/// Heuristic-guided search that stops at the destination.  The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        map: &StreetMap,
        from: IntersectionId,
        to: IntersectionId,
        turn_penalty: f64,
    ) -> RouteResult<Option<Route>> {
        find_path(map, from, to, turn_penalty)
    }
}

/// Uninformed search that finalizes the whole reachable graph before
/// tracing back.  Slower; useful as a reference for the A* router.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        map: &StreetMap,
        from: IntersectionId,
        to: IntersectionId,
        turn_penalty: f64,
    ) -> RouteResult<Option<Route>> {
        check_request(map, from, to, turn_penalty)?;
        if from == to {
            return Ok(Some(Route::trivial()));
        }
        let state = search(map, from, None, turn_penalty);
        Ok(state.best_time(to).map(|travel_time_secs| Route {
            segments: trace_back(map, &state, to),
            travel_time_secs,
        }))
    }
}
