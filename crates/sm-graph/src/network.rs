//! Street graph representation and builder.
//!
//! # Data layout
//!
//! Intersections, segments and streets live in three `Vec`s indexed by their
//! typed ids.  Each intersection carries the ids of every segment touching
//! it, regardless of direction; one-way legality is decided by the caller
//! from [`StreetMap::endpoints`].  A cul-de-sac (`from == to`) is listed once.
//!
//! # Derived data
//!
//! All lengths are measured in the map's local plane (see
//! [`sm_core::Projection`]) so that a straight line between two intersections
//! never exceeds the length of any path joining them.  Travel time is
//! `length / speed_limit`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over projected intersection positions answers
//! closest-intersection queries.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::{debug, info};

use sm_core::{CoreError, IntersectionId, LatLon, PlanarPoint, Projection, SegmentId, StreetId};

use crate::{GraphError, GraphResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct IntersectionEntry {
    point: [f64; 2], // [x, y] metres
    id: IntersectionId,
}

impl RTreeObject for IntersectionEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IntersectionEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Public records ────────────────────────────────────────────────────────────

/// A graph node.  Immutable after [`StreetMapBuilder::build`].
#[derive(Debug, Clone)]
pub struct Intersection {
    pub id: IntersectionId,
    pub name: Option<String>,
    pub position: LatLon,
    /// `position` in the map's local plane.
    pub point: PlanarPoint,
    /// Every segment with this intersection as an endpoint, without duplicates.
    pub segments: Vec<SegmentId>,
}

/// A graph edge.  Two-way unless `one_way`, in which case it may only be
/// driven from `from` to `to`.
#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub id: SegmentId,
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub street: StreetId,
    pub one_way: bool,
    /// Metres per second.
    pub speed_limit: f64,
    /// Interior shape points, ordered from `from` to `to`.
    pub curve_points: Vec<LatLon>,
    /// `from`, curve points, `to` in the local plane.
    pub polyline: Vec<PlanarPoint>,
    pub length_m: f64,
    pub travel_time_secs: f64,
}

impl StreetSegment {
    /// The endpoint opposite `node`.  For a cul-de-sac this is `node` itself.
    #[inline]
    pub fn other_end(&self, node: IntersectionId) -> IntersectionId {
        if node == self.to { self.from } else { self.to }
    }

    /// Can the segment be entered at `node`?
    #[inline]
    pub fn can_leave(&self, node: IntersectionId) -> bool {
        if self.one_way { node == self.from } else { node == self.from || node == self.to }
    }
}

#[derive(Debug, Clone)]
pub struct Street {
    pub id: StreetId,
    pub name: String,
    pub segments: Vec<SegmentId>,
    /// Sorted, deduplicated.
    pub intersections: Vec<IntersectionId>,
    /// Sum of member segment lengths.
    pub length_m: f64,
}

// ── StreetMap ─────────────────────────────────────────────────────────────────

/// Read-only street graph plus load-time indices.
///
/// Do not construct directly; use [`StreetMapBuilder`] or the CSV loader.
/// Accessors index straight into the backing `Vec`s and panic on ids that
/// did not come from this map.
pub struct StreetMap {
    intersections: Vec<Intersection>,
    segments: Vec<StreetSegment>,
    streets: Vec<Street>,
    projection: Projection,
    max_speed_limit: f64,
    spatial_idx: RTree<IntersectionEntry>,
}

impl StreetMap {
    pub fn empty() -> Self {
        StreetMapBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn contains(&self, id: IntersectionId) -> bool {
        id.index() < self.intersections.len()
    }

    /// `Err(IntersectionNotFound)` unless `id` belongs to this map.
    pub fn check(&self, id: IntersectionId) -> Result<(), CoreError> {
        if self.contains(id) { Ok(()) } else { Err(CoreError::IntersectionNotFound(id)) }
    }

    // ── Records ───────────────────────────────────────────────────────────

    pub fn intersection(&self, id: IntersectionId) -> &Intersection {
        &self.intersections[id.index()]
    }

    pub fn segment(&self, id: SegmentId) -> &StreetSegment {
        &self.segments[id.index()]
    }

    pub fn street(&self, id: StreetId) -> &Street {
        &self.streets[id.index()]
    }

    pub fn intersections(&self) -> impl Iterator<Item = &Intersection> + '_ {
        self.intersections.iter()
    }

    pub fn segments(&self) -> impl Iterator<Item = &StreetSegment> + '_ {
        self.segments.iter()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    // ── Graph accessor ────────────────────────────────────────────────────

    /// Segments incident to `id`, in insertion order, without duplicates.
    #[inline]
    pub fn segments_of(&self, id: IntersectionId) -> &[SegmentId] {
        &self.intersections[id.index()].segments
    }

    /// `(from, to, one_way)` of a segment.
    #[inline]
    pub fn endpoints(&self, id: SegmentId) -> (IntersectionId, IntersectionId, bool) {
        let s = &self.segments[id.index()];
        (s.from, s.to, s.one_way)
    }

    /// Seconds to drive the segment at its speed limit.
    #[inline]
    pub fn travel_time(&self, id: SegmentId) -> f64 {
        self.segments[id.index()].travel_time_secs
    }

    #[inline]
    pub fn segment_length(&self, id: SegmentId) -> f64 {
        self.segments[id.index()].length_m
    }

    #[inline]
    pub fn street_of(&self, id: SegmentId) -> StreetId {
        self.segments[id.index()].street
    }

    pub fn street_name(&self, id: StreetId) -> &str {
        &self.streets[id.index()].name
    }

    #[inline]
    pub fn position(&self, id: IntersectionId) -> LatLon {
        self.intersections[id.index()].position
    }

    #[inline]
    pub fn point(&self, id: IntersectionId) -> PlanarPoint {
        self.intersections[id.index()].point
    }

    /// Highest speed limit of any segment, in m/s.  `0.0` for a map without
    /// segments.
    pub fn max_speed_limit(&self) -> f64 {
        self.max_speed_limit
    }

    pub fn segment_polyline(&self, id: SegmentId) -> &[PlanarPoint] {
        &self.segments[id.index()].polyline
    }

    // ── Derived queries ───────────────────────────────────────────────────

    /// Intersections reachable from `id` by driving one segment legally,
    /// without duplicates.  A cul-de-sac contributes `id` itself.
    pub fn adjacent_intersections(&self, id: IntersectionId) -> Vec<IntersectionId> {
        let mut out = Vec::new();
        for &seg in self.segments_of(id) {
            let s = &self.segments[seg.index()];
            if !s.can_leave(id) {
                continue;
            }
            let next = s.other_end(id);
            if !out.contains(&next) {
                out.push(next);
            }
        }
        out
    }

    pub fn intersections_of_street(&self, street: StreetId) -> &[IntersectionId] {
        &self.streets[street.index()].intersections
    }

    /// Intersections shared by two streets, ascending.
    pub fn intersections_of_two_streets(&self, a: StreetId, b: StreetId) -> Vec<IntersectionId> {
        let other = self.intersections_of_street(b);
        self.intersections_of_street(a)
            .iter()
            .copied()
            .filter(|i| other.binary_search(i).is_ok())
            .collect()
    }

    pub fn street_length(&self, street: StreetId) -> f64 {
        self.streets[street.index()].length_m
    }

    /// Straight-line distance between two intersections in the local plane.
    #[inline]
    pub fn straight_line_m(&self, a: IntersectionId, b: IntersectionId) -> f64 {
        self.point(a).distance(self.point(b))
    }

    /// Closest intersection to `pos`, or `None` for an empty map.
    pub fn closest_intersection(&self, pos: LatLon) -> Option<IntersectionId> {
        let p = self.projection.to_planar(pos);
        self.spatial_idx.nearest_neighbor(&[p.x, p.y]).map(|e| e.id)
    }
}

// ── StreetMapBuilder ──────────────────────────────────────────────────────────

/// Shape of one segment handed to [`StreetMapBuilder::add_segment`].
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub street: StreetId,
    pub one_way: bool,
    pub speed_limit: f64,
    pub curve_points: Vec<LatLon>,
}

impl SegmentSpec {
    pub fn two_way(from: IntersectionId, to: IntersectionId, street: StreetId, speed_limit: f64) -> Self {
        Self { from, to, street, one_way: false, speed_limit, curve_points: Vec::new() }
    }

    pub fn one_way(from: IntersectionId, to: IntersectionId, street: StreetId, speed_limit: f64) -> Self {
        Self { one_way: true, ..Self::two_way(from, to, street, speed_limit) }
    }

    pub fn with_curve_points(mut self, points: Vec<LatLon>) -> Self {
        self.curve_points = points;
        self
    }
}

/// Construct a [`StreetMap`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use sm_core::LatLon;
/// use sm_graph::{SegmentSpec, StreetMapBuilder};
///
/// let mut b = StreetMapBuilder::new();
/// let main = b.add_street("Main Street");
/// let a = b.add_intersection(LatLon::new(43.650, -79.380), None);
/// let c = b.add_intersection(LatLon::new(43.651, -79.380), None);
/// b.add_segment(SegmentSpec::two_way(a, c, main, 13.9)).unwrap();
/// let map = b.build();
/// assert_eq!(map.segments_of(a).len(), 1);
/// ```
#[derive(Default)]
pub struct StreetMapBuilder {
    positions: Vec<LatLon>,
    names: Vec<Option<String>>,
    street_names: Vec<String>,
    specs: Vec<SegmentSpec>,
}

impl StreetMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(intersections: usize, segments: usize) -> Self {
        Self {
            positions: Vec::with_capacity(intersections),
            names: Vec::with_capacity(intersections),
            street_names: Vec::new(),
            specs: Vec::with_capacity(segments),
        }
    }

    /// Add an intersection and return its id (sequential from 0).
    pub fn add_intersection(&mut self, pos: LatLon, name: Option<String>) -> IntersectionId {
        let id = IntersectionId(self.positions.len() as u32);
        self.positions.push(pos);
        self.names.push(name);
        id
    }

    /// Add a street and return its id (sequential from 0).
    pub fn add_street(&mut self, name: impl Into<String>) -> StreetId {
        let id = StreetId(self.street_names.len() as u32);
        self.street_names.push(name.into());
        id
    }

    /// Add a segment and return its id (sequential from 0).
    ///
    /// # Errors
    ///
    /// Unknown endpoint or street ids, or a speed limit that is not a
    /// positive finite number.
    pub fn add_segment(&mut self, spec: SegmentSpec) -> GraphResult<SegmentId> {
        for end in [spec.from, spec.to] {
            if end.index() >= self.positions.len() {
                return Err(CoreError::IntersectionNotFound(end).into());
            }
        }
        if spec.street.index() >= self.street_names.len() {
            return Err(CoreError::StreetNotFound(spec.street).into());
        }
        if !spec.speed_limit.is_finite() || spec.speed_limit <= 0.0 {
            return Err(GraphError::InvalidSpeed { index: self.specs.len(), speed: spec.speed_limit });
        }
        let id = SegmentId(self.specs.len() as u32);
        self.specs.push(spec);
        Ok(id)
    }

    pub fn intersection_count(&self) -> usize { self.positions.len() }
    pub fn segment_count(&self) -> usize { self.specs.len() }

    /// Consume the builder and run the load-time precomputation.
    ///
    /// Incidence lists and segment metrics are independent and run as a
    /// pair of tasks; street aggregates (which need segment lengths) and the
    /// R-tree follow as a second pair.  With the `parallel` feature each pair
    /// runs on the Rayon pool.  Nothing is shared mutably between tasks.
    pub fn build(self) -> StreetMap {
        let projection = Projection::centred_on(self.positions.iter().copied());
        let points: Vec<PlanarPoint> =
            self.positions.iter().map(|&p| projection.to_planar(p)).collect();

        let specs = &self.specs;
        let n_intersections = self.positions.len();

        let (incidence, metrics) = join(
            || incidence_lists(n_intersections, specs),
            || segment_metrics(specs, &points, &projection),
        );

        let n_streets = self.street_names.len();
        let (aggregates, spatial_idx) = join(
            || street_aggregates(n_streets, specs, &metrics),
            || spatial_index(&points),
        );

        let max_speed_limit = specs.iter().map(|s| s.speed_limit).fold(0.0, f64::max);

        let segments: Vec<StreetSegment> = self
            .specs
            .into_iter()
            .zip(metrics)
            .enumerate()
            .map(|(i, (spec, (polyline, length_m)))| StreetSegment {
                id: SegmentId(i as u32),
                from: spec.from,
                to: spec.to,
                street: spec.street,
                one_way: spec.one_way,
                speed_limit: spec.speed_limit,
                curve_points: spec.curve_points,
                travel_time_secs: length_m / spec.speed_limit,
                polyline,
                length_m,
            })
            .collect();

        let intersections: Vec<Intersection> = self
            .positions
            .into_iter()
            .zip(self.names)
            .zip(points)
            .zip(incidence)
            .enumerate()
            .map(|(i, (((position, name), point), segments))| Intersection {
                id: IntersectionId(i as u32),
                name,
                position,
                point,
                segments,
            })
            .collect();

        let streets: Vec<Street> = self
            .street_names
            .into_iter()
            .zip(aggregates)
            .enumerate()
            .map(|(i, (name, (segments, intersections, length_m)))| Street {
                id: StreetId(i as u32),
                name,
                segments,
                intersections,
                length_m,
            })
            .collect();

        info!(
            intersections = intersections.len(),
            segments = segments.len(),
            streets = streets.len(),
            max_speed_limit,
            "street map built"
        );

        StreetMap { intersections, segments, streets, projection, max_speed_limit, spatial_idx }
    }
}

// ── Precomputation tasks ──────────────────────────────────────────────────────

#[cfg(feature = "parallel")]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

fn incidence_lists(n: usize, specs: &[SegmentSpec]) -> Vec<Vec<SegmentId>> {
    let mut lists = vec![Vec::new(); n];
    for (i, s) in specs.iter().enumerate() {
        let id = SegmentId(i as u32);
        lists[s.from.index()].push(id);
        if s.to != s.from {
            lists[s.to.index()].push(id);
        }
    }
    lists
}

/// `(polyline, length_m)` per segment.
fn segment_metrics(
    specs: &[SegmentSpec],
    points: &[PlanarPoint],
    projection: &Projection,
) -> Vec<(Vec<PlanarPoint>, f64)> {
    specs
        .iter()
        .map(|s| {
            let mut polyline = Vec::with_capacity(s.curve_points.len() + 2);
            polyline.push(points[s.from.index()]);
            polyline.extend(s.curve_points.iter().map(|&c| projection.to_planar(c)));
            polyline.push(points[s.to.index()]);
            let length = polyline.windows(2).map(|w| w[0].distance(w[1])).sum();
            (polyline, length)
        })
        .collect()
}

/// `(segments, intersections, length_m)` per street.
fn street_aggregates(
    n: usize,
    specs: &[SegmentSpec],
    metrics: &[(Vec<PlanarPoint>, f64)],
) -> Vec<(Vec<SegmentId>, Vec<IntersectionId>, f64)> {
    let mut out: Vec<(Vec<SegmentId>, Vec<IntersectionId>, f64)> = vec![(Vec::new(), Vec::new(), 0.0); n];
    for (i, s) in specs.iter().enumerate() {
        let entry = &mut out[s.street.index()];
        entry.0.push(SegmentId(i as u32));
        entry.1.push(s.from);
        entry.1.push(s.to);
        entry.2 += metrics[i].1;
    }
    for entry in &mut out {
        entry.1.sort_unstable();
        entry.1.dedup();
    }
    debug!(streets = n, "street aggregates computed");
    out
}

fn spatial_index(points: &[PlanarPoint]) -> RTree<IntersectionEntry> {
    let entries: Vec<IntersectionEntry> = points
        .iter()
        .enumerate()
        .map(|(i, p)| IntersectionEntry { point: [p.x, p.y], id: IntersectionId(i as u32) })
        .collect();
    RTree::bulk_load(entries)
}
