//! Courier tour construction.
//!
//! # Heuristic
//!
//! For every depot, in the order given:
//!
//! 1. **Greedy construction.**  Start at the depot and repeatedly drive to
//!    the nearest stop (by matrix travel time) that is still useful: a
//!    pending pickup, or a drop-off point whose packages are all on board.
//!    Once every package is delivered, close at the nearest depot.  If some
//!    useful stop or the closing depot cannot be reached, this start is
//!    infeasible.
//! 2. **Tail swap.**  Walking back from the last delivery stop, try
//!    exchanging the visit order of adjacent stops, at most
//!    `tail_swap_window` pairs.  A swap is kept if it preserves pickup
//!    before drop-off, every leg exists in the matrix, and the total time
//!    strictly drops.  The first such swap ends the pass.
//!
//! The cheapest tour over all starts wins; ties keep the earlier depot.
//! Nothing here runs a search; all times come from the [`PathMatrix`].

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use sm_core::{IntersectionId, RoutingConfig};
use sm_graph::StreetMap;

use crate::delivery::{Delivery, Progress};
use crate::matrix::{PathMatrix, Subpath};
use crate::CourierResult;

// ── Tour ──────────────────────────────────────────────────────────────────────

/// A closed courier tour: depot, stops, depot.
///
/// Consecutive subpaths are contiguous (`subpaths[i].end ==
/// subpaths[i + 1].start`).  An empty tour means no feasible tour was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tour {
    pub subpaths: Vec<Subpath>,
    pub travel_time_secs: f64,
}

impl Tour {
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_subpaths(subpaths: Vec<Subpath>) -> Self {
        let travel_time_secs = subpaths.iter().map(|s| s.travel_time_secs).sum();
        Self { subpaths, travel_time_secs }
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Intersections visited in order, start depot and end depot included.
    pub fn intersections(&self) -> Vec<IntersectionId> {
        let Some(first) = self.subpaths.first() else {
            return Vec::new();
        };
        std::iter::once(first.start).chain(self.subpaths.iter().map(|s| s.end)).collect()
    }

    /// Start and end depot.
    pub fn depots(&self) -> Option<(IntersectionId, IntersectionId)> {
        Some((self.subpaths.first()?.start, self.subpaths.last()?.end))
    }

    /// Does this tour deliver every package in `deliveries`, picking each up
    /// strictly before dropping it off, starting and ending at a depot?
    pub fn serves(&self, deliveries: &[Delivery], depots: &[IntersectionId]) -> bool {
        let stops = self.intersections();
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return false;
        };
        if !depots.contains(first) || !depots.contains(last) {
            return false;
        }
        if self.subpaths.windows(2).any(|w| w[0].end != w[1].start) {
            return false;
        }
        let mut progress = Progress::new(deliveries);
        for &stop in &stops[1..stops.len() - 1] {
            progress.visit(stop);
        }
        progress.is_complete()
    }
}

// ── TourPlanner ───────────────────────────────────────────────────────────────

/// Plans courier tours from a prebuilt [`PathMatrix`].
#[derive(Debug, Clone, Copy)]
pub struct TourPlanner<'m> {
    matrix: &'m PathMatrix,
    tail_swap_window: usize,
}

impl<'m> TourPlanner<'m> {
    pub fn new(matrix: &'m PathMatrix) -> Self {
        Self { matrix, tail_swap_window: RoutingConfig::default().tail_swap_window }
    }

    pub fn with_tail_swap_window(mut self, pairs: usize) -> Self {
        self.tail_swap_window = pairs;
        self
    }

    /// Best tour found over all start depots, or an empty tour if no start
    /// is feasible.
    ///
    /// Every point in `deliveries` and `depots` should be a point of the
    /// matrix; an unknown point behaves as unreachable.
    pub fn plan(&self, deliveries: &[Delivery], depots: &[IntersectionId]) -> Tour {
        if deliveries.is_empty() || depots.is_empty() {
            warn!(
                deliveries = deliveries.len(),
                depots = depots.len(),
                "nothing to plan"
            );
            return Tour::empty();
        }

        let depot_set: FxHashSet<IntersectionId> = depots.iter().copied().collect();
        let mut best: Option<Tour> = None;

        for &start in depots {
            let Some(stops) = self.construct(start, deliveries, &depot_set) else {
                debug!(%start, "no feasible tour from this depot");
                continue;
            };
            let stops = self.tail_swap(stops, deliveries, &depot_set);
            let Some(subpaths) = self.legs(&stops) else {
                continue;
            };
            let tour = Tour::from_subpaths(subpaths);
            debug!(%start, time = tour.travel_time_secs, "candidate tour");
            if best.as_ref().is_none_or(|b| tour.travel_time_secs < b.travel_time_secs) {
                best = Some(tour);
            }
        }

        best.unwrap_or_default()
    }

    // ── Greedy construction ───────────────────────────────────────────────

    /// Stop sequence `[start, …, closing depot]`, or `None` if infeasible.
    fn construct(
        &self,
        start: IntersectionId,
        deliveries: &[Delivery],
        depot_set: &FxHashSet<IntersectionId>,
    ) -> Option<Vec<IntersectionId>> {
        let mut progress = Progress::new(deliveries);
        let mut stops = vec![start];
        let mut at = start;

        while !progress.is_complete() {
            let next = nearest(self.matrix.row(at).filter(|s| progress.wants(s.end)))?;
            at = next.end;
            progress.visit(at);
            stops.push(at);
        }

        stops.push(self.closing_depot(at, depot_set)?);
        Some(stops)
    }

    fn closing_depot(
        &self,
        at: IntersectionId,
        depot_set: &FxHashSet<IntersectionId>,
    ) -> Option<IntersectionId> {
        nearest(self.matrix.row(at).filter(|s| depot_set.contains(&s.end))).map(|s| s.end)
    }

    // ── Tail swap ─────────────────────────────────────────────────────────

    /// One improvement pass over the last `tail_swap_window` adjacent pairs
    /// of delivery stops.  Returns `stops` unchanged if nothing improves.
    fn tail_swap(
        &self,
        stops: Vec<IntersectionId>,
        deliveries: &[Delivery],
        depot_set: &FxHashSet<IntersectionId>,
    ) -> Vec<IntersectionId> {
        // stops[0] and stops[last] are depots; delivery stops are 1..=last_stop.
        let last_stop = stops.len() - 2;
        let Some(current) = self.total(&stops) else {
            return stops;
        };

        for i in (1..last_stop).rev().take(self.tail_swap_window) {
            let mut candidate = stops[..=last_stop].to_vec();
            candidate.swap(i, i + 1);
            if !precedence_holds(&candidate[1..], deliveries) {
                continue;
            }
            let Some(close) = self.closing_depot(candidate[last_stop], depot_set) else {
                continue;
            };
            candidate.push(close);
            if let Some(time) = self.total(&candidate) {
                if time < current {
                    debug!(swapped = i, before = current, after = time, "tail swap kept");
                    return candidate;
                }
            }
        }
        stops
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn legs(&self, stops: &[IntersectionId]) -> Option<Vec<Subpath>> {
        stops.windows(2).map(|w| self.matrix.get(w[0], w[1]).cloned()).collect()
    }

    fn total(&self, stops: &[IntersectionId]) -> Option<f64> {
        stops
            .windows(2)
            .map(|w| self.matrix.get(w[0], w[1]).map(|s| s.travel_time_secs))
            .sum()
    }
}

/// Cheapest subpath; the first one wins a tie.
fn nearest<'a>(candidates: impl Iterator<Item = &'a Subpath>) -> Option<&'a Subpath> {
    candidates.fold(None, |best, s| match best {
        Some(b) if b.travel_time_secs <= s.travel_time_secs => Some(b),
        _ => Some(s),
    })
}

/// Visiting `stops` in order makes progress at every stop and delivers
/// everything.
fn precedence_holds(stops: &[IntersectionId], deliveries: &[Delivery]) -> bool {
    let mut progress = Progress::new(deliveries);
    for &stop in stops {
        if !progress.wants(stop) {
            return false;
        }
        progress.visit(stop);
    }
    progress.is_complete()
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Build the path matrix and plan a tour in one call.
///
/// Uses [`PathMatrix::build_parallel`] when `config.parallel_matrix` is set
/// and the `parallel` feature is enabled.
///
/// # Errors
///
/// Unknown intersection ids or an invalid `config`.  An infeasible job is
/// not an error; it returns an empty tour.
pub fn plan_courier_tour(
    map: &StreetMap,
    deliveries: &[Delivery],
    depots: &[IntersectionId],
    config: &RoutingConfig,
) -> CourierResult<Tour> {
    config.validate()?;
    let matrix = build_matrix(map, deliveries, depots, config)?;
    let tour = TourPlanner::new(&matrix)
        .with_tail_swap_window(config.tail_swap_window)
        .plan(deliveries, depots);

    if tour.is_empty() {
        info!(deliveries = deliveries.len(), depots = depots.len(), "no feasible courier tour");
    } else {
        info!(
            stops = tour.subpaths.len() + 1,
            time = tour.travel_time_secs,
            "courier tour planned"
        );
    }
    Ok(tour)
}

#[cfg(feature = "parallel")]
fn build_matrix(
    map: &StreetMap,
    deliveries: &[Delivery],
    depots: &[IntersectionId],
    config: &RoutingConfig,
) -> CourierResult<PathMatrix> {
    if config.parallel_matrix {
        PathMatrix::build_parallel(map, deliveries, depots, config.turn_penalty_secs)
    } else {
        PathMatrix::build(map, deliveries, depots, config.turn_penalty_secs)
    }
}

#[cfg(not(feature = "parallel"))]
fn build_matrix(
    map: &StreetMap,
    deliveries: &[Delivery],
    depots: &[IntersectionId],
    config: &RoutingConfig,
) -> CourierResult<PathMatrix> {
    if config.parallel_matrix {
        warn!("parallel_matrix requested but sm-courier was built without `parallel`");
    }
    PathMatrix::build(map, deliveries, depots, config.turn_penalty_secs)
}
