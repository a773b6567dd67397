//! All-pairs shortest paths between the points of interest of a courier job.
//!
//! Points are the pickups, then the drop-offs, then the depots, each kept
//! once in first-seen order.  One full search runs per point.  Every other
//! reached point yields a [`Subpath`]; unreachable pairs are simply absent.
//! A point is never paired with itself.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use sm_core::{IntersectionId, RoutingConfig, SegmentId};
use sm_graph::StreetMap;
use sm_route::{SearchState, search_into, trace_back};

use crate::delivery::{Delivery, StopKind};
use crate::CourierResult;

// ── Subpath ───────────────────────────────────────────────────────────────────

/// Shortest path between two points of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub start: IntersectionId,
    pub end: IntersectionId,
    pub segments: Vec<SegmentId>,
    /// Search time to `end`, turn penalties included.
    pub travel_time_secs: f64,
    /// Role of `end`.
    pub kind: StopKind,
}

// ── PathMatrix ────────────────────────────────────────────────────────────────

/// Dense `|P| × |P|` table of subpaths over the points of interest `P`.
#[derive(Debug, Clone)]
pub struct PathMatrix {
    points: Vec<IntersectionId>,
    kinds: Vec<StopKind>,
    index: FxHashMap<IntersectionId, usize>,
    /// Row-major; `cells[i * n + j]` is the path from point `i` to point `j`.
    cells: Vec<Option<Subpath>>,
    turn_penalty: f64,
}

impl PathMatrix {
    /// Build the matrix on the calling thread, reusing one search state.
    ///
    /// # Errors
    ///
    /// An id that is not an intersection of `map`, or an invalid penalty.
    pub fn build(
        map: &StreetMap,
        deliveries: &[Delivery],
        depots: &[IntersectionId],
        turn_penalty: f64,
    ) -> CourierResult<Self> {
        let mut matrix = Self::prepare(map, deliveries, depots, turn_penalty)?;
        let mut state = SearchState::for_map(map);
        let rows: Vec<Vec<Option<Subpath>>> = matrix
            .points
            .iter()
            .map(|&source| matrix.row_from(map, &mut state, source))
            .collect();
        matrix.fill(rows);
        Ok(matrix)
    }

    /// Build the matrix with one Rayon task per point, each with its own
    /// search state.  The result is identical to [`build`](Self::build).
    #[cfg(feature = "parallel")]
    pub fn build_parallel(
        map: &StreetMap,
        deliveries: &[Delivery],
        depots: &[IntersectionId],
        turn_penalty: f64,
    ) -> CourierResult<Self> {
        use rayon::prelude::*;

        let mut matrix = Self::prepare(map, deliveries, depots, turn_penalty)?;
        let rows: Vec<Vec<Option<Subpath>>> = matrix
            .points
            .par_iter()
            .map_init(
                || SearchState::for_map(map),
                |state, &source| matrix.row_from(map, state, source),
            )
            .collect();
        matrix.fill(rows);
        Ok(matrix)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Points of interest in matrix order.
    pub fn points(&self) -> &[IntersectionId] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn turn_penalty(&self) -> f64 {
        self.turn_penalty
    }

    pub fn contains(&self, point: IntersectionId) -> bool {
        self.index.contains_key(&point)
    }

    pub fn kind_of(&self, point: IntersectionId) -> Option<StopKind> {
        self.index.get(&point).map(|&i| self.kinds[i])
    }

    /// Shortest path from `from` to `to`, `None` if either is not a point of
    /// interest, they are the same point, or `to` is unreachable.
    #[inline]
    pub fn get(&self, from: IntersectionId, to: IntersectionId) -> Option<&Subpath> {
        let (&i, &j) = (self.index.get(&from)?, self.index.get(&to)?);
        self.cells[i * self.points.len() + j].as_ref()
    }

    /// Every stored subpath leaving `from`, in matrix order of their ends.
    pub fn row(&self, from: IntersectionId) -> impl Iterator<Item = &Subpath> + '_ {
        let n = self.points.len();
        let cells = match self.index.get(&from) {
            Some(&i) => &self.cells[i * n..(i + 1) * n],
            None => &[][..],
        };
        cells.iter().flatten()
    }

    /// Number of stored (reachable) ordered pairs.
    pub fn reachable_pairs(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    // ── Construction ──────────────────────────────────────────────────────

    fn prepare(
        map: &StreetMap,
        deliveries: &[Delivery],
        depots: &[IntersectionId],
        turn_penalty: f64,
    ) -> CourierResult<Self> {
        RoutingConfig::with_turn_penalty(turn_penalty).validate()?;

        let mut points = Vec::new();
        let mut kinds = Vec::new();
        let mut index = FxHashMap::default();
        let roles = deliveries
            .iter()
            .map(|d| (d.pickup, StopKind::Pickup))
            .chain(deliveries.iter().map(|d| (d.drop_off, StopKind::DropOff)))
            .chain(depots.iter().map(|&d| (d, StopKind::Depot)));
        for (point, kind) in roles {
            map.check(point)?;
            if !index.contains_key(&point) {
                index.insert(point, points.len());
                points.push(point);
                kinds.push(kind);
            }
        }

        Ok(Self { points, kinds, index, cells: Vec::new(), turn_penalty })
    }

    /// One full search from `source`, then a subpath to every other reached
    /// point.
    fn row_from(
        &self,
        map: &StreetMap,
        state: &mut SearchState,
        source: IntersectionId,
    ) -> Vec<Option<Subpath>> {
        search_into(map, state, source, None, self.turn_penalty);
        let row: Vec<Option<Subpath>> = self
            .points
            .iter()
            .zip(&self.kinds)
            .map(|(&end, &kind)| {
                if end == source {
                    return None;
                }
                let travel_time_secs = state.best_time(end)?;
                Some(Subpath {
                    start: source,
                    end,
                    segments: trace_back(map, state, end),
                    travel_time_secs,
                    kind,
                })
            })
            .collect();
        debug!(
            %source,
            reached = row.iter().filter(|c| c.is_some()).count(),
            of = self.points.len() - 1,
            "matrix row"
        );
        row
    }

    fn fill(&mut self, rows: Vec<Vec<Option<Subpath>>>) {
        self.cells = rows.into_iter().flatten().collect();
        info!(
            points = self.points.len(),
            reachable = self.reachable_pairs(),
            turn_penalty = self.turn_penalty,
            "path matrix built"
        );
    }
}
