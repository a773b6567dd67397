//! Unit tests for sm-route.
//!
//! All maps sit near (0°, 0°) where 0.001° is about 111 m.

#[cfg(test)]
mod helpers {
    use sm_core::{IntersectionId, LatLon};
    use sm_graph::{SegmentSpec, StreetMap, StreetMapBuilder};

    /// One-way ring A→B→C→D→A, 10 m/s everywhere.
    ///
    /// ```text
    ///   D ◀──── C
    ///   │       ▲
    ///   ▼       │
    ///   A ────▶ B
    /// ```
    ///
    /// With `same_street` every side is "Ring Road"; otherwise each side is
    /// its own street.
    pub fn square(same_street: bool) -> (StreetMap, [IntersectionId; 4]) {
        let mut b = StreetMapBuilder::new();
        let streets = if same_street {
            let ring = b.add_street("Ring Road");
            [ring; 4]
        } else {
            [
                b.add_street("Front Street"),
                b.add_street("East Avenue"),
                b.add_street("King Street"),
                b.add_street("West Avenue"),
            ]
        };
        let a = b.add_intersection(LatLon::new(0.000, 0.000), None);
        let bb = b.add_intersection(LatLon::new(0.000, 0.001), None);
        let c = b.add_intersection(LatLon::new(0.001, 0.001), None);
        let d = b.add_intersection(LatLon::new(0.001, 0.000), None);

        b.add_segment(SegmentSpec::one_way(a, bb, streets[0], 10.0)).unwrap();
        b.add_segment(SegmentSpec::one_way(bb, c, streets[1], 10.0)).unwrap();
        b.add_segment(SegmentSpec::one_way(c, d, streets[2], 10.0)).unwrap();
        b.add_segment(SegmentSpec::one_way(d, a, streets[3], 10.0)).unwrap();
        (b.build(), [a, bb, c, d])
    }

    /// Two ways from S to T:
    ///
    /// ```text
    ///   N1 ═══════ Fast Avenue (30 m/s) ═══════ N2
    ///   │ West Spur (15 m/s)          East Spur │
    ///   S ──── Main Street (5 m/s) ── M ──────── T
    /// ```
    ///
    /// Main Street takes about 89 s with no turns.  The detour takes about
    /// 29.7 s plus two turn penalties, so it wins below a penalty of ~29.6 s.
    pub fn two_routes() -> (StreetMap, [IntersectionId; 5]) {
        let mut b = StreetMapBuilder::new();
        let main = b.add_street("Main Street");
        let west = b.add_street("West Spur");
        let fast = b.add_street("Fast Avenue");
        let east = b.add_street("East Spur");

        let s = b.add_intersection(LatLon::new(0.000, 0.000), Some("S".into()));
        let m = b.add_intersection(LatLon::new(0.000, 0.002), None);
        let t = b.add_intersection(LatLon::new(0.000, 0.004), Some("T".into()));
        let n1 = b.add_intersection(LatLon::new(0.001, 0.000), None);
        let n2 = b.add_intersection(LatLon::new(0.001, 0.004), None);

        b.add_segment(SegmentSpec::two_way(s, m, main, 5.0)).unwrap(); // 0
        b.add_segment(SegmentSpec::two_way(m, t, main, 5.0)).unwrap(); // 1
        b.add_segment(SegmentSpec::two_way(s, n1, west, 15.0)).unwrap(); // 2
        b.add_segment(SegmentSpec::two_way(n1, n2, fast, 30.0)).unwrap(); // 3
        b.add_segment(SegmentSpec::two_way(n2, t, east, 15.0)).unwrap(); // 4
        (b.build(), [s, m, t, n1, n2])
    }

    /// 3×3 grid.  Rows are two-way streets with different speeds; column 1
    /// is one-way northbound; a cul-de-sac hangs off the centre.
    pub fn grid() -> (StreetMap, Vec<IntersectionId>) {
        let mut b = StreetMapBuilder::new();
        let mut ids = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                ids.push(b.add_intersection(LatLon::new(r as f64 * 0.001, c as f64 * 0.001), None));
            }
        }
        let at = |r: usize, c: usize| ids[r * 3 + c];
        for r in 0..3 {
            let street = b.add_street(format!("Row {r}"));
            for c in 0..2 {
                let speed = 10.0 + r as f64 * 5.0;
                b.add_segment(SegmentSpec::two_way(at(r, c), at(r, c + 1), street, speed)).unwrap();
            }
        }
        for c in 0..3 {
            let street = b.add_street(format!("Column {c}"));
            for r in 0..2 {
                let spec = if c == 1 {
                    SegmentSpec::one_way(at(r, c), at(r + 1, c), street, 8.0)
                } else {
                    SegmentSpec::two_way(at(r, c), at(r + 1, c), street, 8.0)
                };
                b.add_segment(spec).unwrap();
            }
        }
        let court = b.add_street("Centre Court");
        b.add_segment(
            SegmentSpec::two_way(at(1, 1), at(1, 1), court, 5.0)
                .with_curve_points(vec![LatLon::new(0.0015, 0.0015), LatLon::new(0.0015, 0.0005)]),
        )
        .unwrap();
        (b.build(), ids)
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Search & trace-back ───────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use sm_core::{LatLon, SegmentId};
    use sm_graph::{SegmentSpec, StreetMapBuilder};

    use super::helpers::close;
    use crate::{SearchState, path_intersections, path_travel_time, search, search_into, trace_back};

    #[test]
    fn square_only_route_is_around_the_corner() {
        let (map, [a, b, c, _]) = super::helpers::square(false);
        let state = search(&map, a, Some(c), 15.0);
        let path = trace_back(&map, &state, c);
        assert_eq!(path, vec![SegmentId(0), SegmentId(1)]);

        let expected = map.travel_time(SegmentId(0)) + map.travel_time(SegmentId(1)) + 15.0;
        assert!(close(state.best_time(c).unwrap(), expected));
        assert_eq!(state.reaching_edge(b), Some(SegmentId(0)));
    }

    #[test]
    fn square_same_street_has_no_penalty() {
        let (map, [a, _, c, _]) = super::helpers::square(true);
        let state = search(&map, a, Some(c), 15.0);
        let expected = map.travel_time(SegmentId(0)) + map.travel_time(SegmentId(1));
        assert!(close(state.best_time(c).unwrap(), expected));
    }

    #[test]
    fn source_state() {
        let (map, [a, ..]) = super::helpers::square(false);
        let state = search(&map, a, None, 15.0);
        assert_eq!(state.source(), Some(a));
        assert_eq!(state.best_time(a), Some(0.0));
        assert_eq!(state.reaching_edge(a), None);
        assert!(trace_back(&map, &state, a).is_empty());
    }

    #[test]
    fn multi_destination_finalizes_everything_reachable() {
        let (map, ids) = super::helpers::grid();
        let state = search(&map, ids[0], None, 15.0);
        assert_eq!(state.finalized_count(), map.intersection_count());
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = StreetMapBuilder::new();
        let s = b.add_street("One Way Street");
        let a = b.add_intersection(LatLon::new(0.0, 0.0), None);
        let c = b.add_intersection(LatLon::new(0.0, 0.001), None);
        b.add_segment(SegmentSpec::one_way(a, c, s, 10.0)).unwrap();
        let map = b.build();

        let forward = search(&map, a, Some(c), 0.0);
        assert_eq!(trace_back(&map, &forward, c), vec![SegmentId(0)]);

        let back = search(&map, c, Some(a), 0.0);
        assert_eq!(back.best_time(a), None);
        assert!(trace_back(&map, &back, a).is_empty());
    }

    #[test]
    fn cul_de_sac_is_harmless() {
        let mut b = StreetMapBuilder::new();
        let s = b.add_street("Dead End Court");
        let a = b.add_intersection(LatLon::new(0.0, 0.0), None);
        let c = b.add_intersection(LatLon::new(0.0, 0.001), None);
        b.add_segment(SegmentSpec::two_way(a, c, s, 10.0)).unwrap();
        b.add_segment(
            SegmentSpec::two_way(c, c, s, 10.0)
                .with_curve_points(vec![LatLon::new(0.0005, 0.0015)]),
        )
        .unwrap();
        let map = b.build();

        let state = search(&map, c, None, 15.0);
        assert_eq!(state.finalized_count(), 2);
        assert_eq!(trace_back(&map, &state, a), vec![SegmentId(0)]);
        assert!(trace_back(&map, &state, c).is_empty());

        let state = search(&map, a, Some(c), 15.0);
        assert_eq!(trace_back(&map, &state, c), vec![SegmentId(0)]);
    }

    #[test]
    fn early_exit_finalizes_fewer_nodes() {
        let mut b = StreetMapBuilder::new();
        let s = b.add_street("Long Road");
        let ids: Vec<_> = (0..6)
            .map(|i| b.add_intersection(LatLon::new(0.0, i as f64 * 0.001), None))
            .collect();
        for w in ids.windows(2) {
            b.add_segment(SegmentSpec::two_way(w[0], w[1], s, 10.0)).unwrap();
        }
        let map = b.build();

        let guided = search(&map, ids[2], Some(ids[3]), 0.0);
        let full = search(&map, ids[2], None, 0.0);
        assert_eq!(full.finalized_count(), 6);
        assert!(guided.finalized_count() < full.finalized_count());
        assert!(close(guided.best_time(ids[3]).unwrap(), full.best_time(ids[3]).unwrap()));
    }

    #[test]
    fn reused_state_is_reset() {
        let mut b = StreetMapBuilder::new();
        let s = b.add_street("Island Road");
        let a = b.add_intersection(LatLon::new(0.0, 0.0), None);
        let c = b.add_intersection(LatLon::new(0.0, 0.001), None);
        let island = b.add_intersection(LatLon::new(0.01, 0.01), None);
        b.add_segment(SegmentSpec::two_way(a, c, s, 10.0)).unwrap();
        let map = b.build();

        let mut state = SearchState::for_map(&map);
        search_into(&map, &mut state, a, None, 0.0);
        assert!(state.is_finalized(c));

        search_into(&map, &mut state, island, None, 0.0);
        assert_eq!(state.finalized_count(), 1);
        assert_eq!(state.best_time(c), None);
        assert_eq!(state.best_time(island), Some(0.0));
    }

    #[test]
    fn traced_paths_are_legal_and_match_best_times() {
        let (map, ids) = super::helpers::grid();
        for penalty in [0.0, 15.0, 120.0] {
            for &source in &ids {
                let state = search(&map, source, None, penalty);
                for &dest in &ids {
                    let Some(best) = state.best_time(dest) else { continue };
                    let path = trace_back(&map, &state, dest);
                    let nodes = path_intersections(&map, &path, source)
                        .expect("traced path must be drivable");
                    assert_eq!(*nodes.last().unwrap(), dest);
                    let recomputed = path_travel_time(&map, &path, penalty);
                    assert!((recomputed - best).abs() < 1e-6, "{recomputed} vs {best}");
                }
            }
        }
    }

    #[test]
    fn guided_and_full_search_agree_on_distinct_costs() {
        let (map, ids) = super::helpers::two_routes();
        for penalty in [0.0, 15.0, 60.0] {
            for &from in &ids {
                let full = search(&map, from, None, penalty);
                for &to in &ids {
                    let guided = search(&map, from, Some(to), penalty);
                    let (g, f) = (guided.best_time(to).unwrap(), full.best_time(to).unwrap());
                    assert!((g - f).abs() < 1e-6, "{from}->{to} @ {penalty}: {g} vs {f}");
                }
            }
        }
    }
}

// ── Point-to-point routes ─────────────────────────────────────────────────────

#[cfg(test)]
mod routes {
    use sm_core::{CoreError, IntersectionId, LatLon, SegmentId};
    use sm_graph::StreetMapBuilder;

    use crate::{AStarRouter, DijkstraRouter, RouteError, Router, find_path, path_travel_time};

    #[test]
    fn same_intersection_is_trivial() {
        let (map, [s, ..]) = super::helpers::two_routes();
        let route = find_path(&map, s, s, 15.0).unwrap().unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.travel_time_secs, 0.0);
    }

    #[test]
    fn unreachable_is_none() {
        let mut b = StreetMapBuilder::new();
        let a = b.add_intersection(LatLon::new(0.0, 0.0), None);
        let c = b.add_intersection(LatLon::new(1.0, 0.0), None);
        let map = b.build();
        assert!(find_path(&map, a, c, 15.0).unwrap().is_none());
        assert!(DijkstraRouter.route(&map, a, c, 15.0).unwrap().is_none());
    }

    #[test]
    fn unknown_intersection_is_an_error() {
        let (map, [s, ..]) = super::helpers::two_routes();
        let err = find_path(&map, s, IntersectionId(42), 15.0).unwrap_err();
        assert!(matches!(err, RouteError::Core(CoreError::IntersectionNotFound(IntersectionId(42)))));
    }

    #[test]
    fn negative_penalty_is_an_error() {
        let (map, [s, _, t, ..]) = super::helpers::two_routes();
        assert!(matches!(
            find_path(&map, s, t, -1.0),
            Err(RouteError::Core(CoreError::Config(_)))
        ));
    }

    #[test]
    fn low_penalty_takes_the_fast_detour() {
        let (map, [s, _, t, ..]) = super::helpers::two_routes();
        let route = find_path(&map, s, t, 0.0).unwrap().unwrap();
        assert_eq!(route.segments, vec![SegmentId(2), SegmentId(3), SegmentId(4)]);
    }

    #[test]
    fn high_penalty_stays_on_main_street() {
        let (map, [s, _, t, ..]) = super::helpers::two_routes();
        let route = find_path(&map, s, t, 60.0).unwrap().unwrap();
        assert_eq!(route.segments, vec![SegmentId(0), SegmentId(1)]);
        assert!((route.travel_time_secs - path_travel_time(&map, &route.segments, 60.0)).abs() < 1e-9);
    }

    #[test]
    fn route_time_never_drops_as_penalty_rises() {
        let (map, [s, _, t, ..]) = super::helpers::two_routes();
        let times: Vec<f64> = [0.0, 10.0, 20.0, 29.0, 30.0, 45.0, 60.0, 300.0]
            .iter()
            .map(|&p| find_path(&map, s, t, p).unwrap().unwrap().travel_time_secs)
            .collect();
        for w in times.windows(2) {
            assert!(w[1] >= w[0] - 1e-9, "{times:?}");
        }
    }

    #[test]
    fn routers_agree() {
        let (map, ids) = super::helpers::two_routes();
        for &from in &ids {
            for &to in &ids {
                let a = AStarRouter.route(&map, from, to, 15.0).unwrap().unwrap();
                let d = DijkstraRouter.route(&map, from, to, 15.0).unwrap().unwrap();
                assert!((a.travel_time_secs - d.travel_time_secs).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn path_travel_time_counts_street_changes() {
        let (map, _) = super::helpers::two_routes();
        let detour = [SegmentId(2), SegmentId(3), SegmentId(4)];
        let base: f64 = detour.iter().map(|&s| map.travel_time(s)).sum();
        assert!((path_travel_time(&map, &detour, 7.0) - (base + 14.0)).abs() < 1e-9);
        assert_eq!(path_travel_time(&map, &[], 7.0), 0.0);
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod narration {
    use sm_core::{LatLon, PlanarPoint, SegmentId};
    use sm_graph::{SegmentSpec, StreetMapBuilder};

    use crate::{Turn, directions, find_path, turn_direction};

    #[test]
    fn cross_product_sign() {
        let pre = PlanarPoint::new(0.0, 0.0);
        let link = PlanarPoint::new(10.0, 0.0);
        // Heading east.
        assert_eq!(turn_direction(pre, link, PlanarPoint::new(10.0, -10.0)), Turn::Right);
        assert_eq!(turn_direction(pre, link, PlanarPoint::new(10.0, 10.0)), Turn::Left);
        assert_eq!(turn_direction(pre, link, PlanarPoint::new(20.0, 0.0)), Turn::Straight);
    }

    #[test]
    fn left_turn_around_the_square() {
        let (map, [a, ..]) = super::helpers::square(false);
        let lines = directions(&map, a, &[SegmentId(0), SegmentId(1)]);
        assert_eq!(
            lines,
            vec![
                "Begin the route on Front Street and West Avenue.",
                "Continue down Front Street for 111 metres.",
                "Turn left onto East Avenue.",
                "Continue down East Avenue for 111 metres to reach your destination.",
            ]
        );
    }

    #[test]
    fn single_street_route() {
        let (map, [a, ..]) = super::helpers::square(true);
        let lines = directions(&map, a, &[SegmentId(0), SegmentId(1)]);
        assert_eq!(
            lines,
            vec![
                "Begin the route on Ring Road.",
                "Continue down Ring Road for 222 metres to reach your destination.",
            ]
        );
    }

    #[test]
    fn right_turns_on_the_detour() {
        let (map, [s, ..]) = super::helpers::two_routes();
        let lines = directions(&map, s, &[SegmentId(2), SegmentId(3), SegmentId(4)]);
        // North, then east (right), then south (right).
        assert_eq!(lines[0], "Begin the route on West Spur and Main Street.");
        assert_eq!(lines[2], "Turn right onto Fast Avenue.");
        assert_eq!(lines[4], "Turn right onto East Spur.");
        assert!(lines[5].ends_with("metres to reach your destination."));
    }

    #[test]
    fn empty_path_has_no_directions() {
        let (map, [a, ..]) = super::helpers::square(false);
        assert!(directions(&map, a, &[]).is_empty());
    }

    #[test]
    fn illegal_path_has_no_directions() {
        let (map, [a, b, c, _]) = super::helpers::square(false);
        // C→D then A→B: not contiguous.
        assert!(directions(&map, c, &[SegmentId(2), SegmentId(0)]).is_empty());
        // A→B driven from B: against the one-way.
        assert!(directions(&map, b, &[SegmentId(0)]).is_empty());
        assert!(!directions(&map, a, &[SegmentId(0)]).is_empty());
    }

    #[test]
    fn lone_two_way_segment_is_narrated_from_its_start() {
        let (map, [_, m, t, ..]) = super::helpers::two_routes();
        let route = find_path(&map, t, m, 60.0).unwrap().unwrap();
        assert_eq!(route.segments, vec![SegmentId(1)]);

        // T also touches East Spur; M touches only Main Street.
        let backwards = directions(&map, t, &route.segments);
        assert_eq!(
            backwards,
            vec![
                "Begin the route on Main Street and East Spur.",
                "Continue down Main Street for 222 metres to reach your destination.",
            ]
        );
        let forwards = directions(&map, m, &route.segments);
        assert_eq!(forwards[0], "Begin the route on Main Street.");
    }

    #[test]
    fn opening_line_names_the_last_cross_street() {
        let mut b = StreetMapBuilder::new();
        let main = b.add_street("Main Street");
        let first = b.add_street("First Avenue");
        let second = b.add_street("Second Avenue");
        let x = b.add_intersection(LatLon::new(0.0, 0.0), None);
        let east = b.add_intersection(LatLon::new(0.0, 0.001), None);
        let north = b.add_intersection(LatLon::new(0.001, 0.0), None);
        let south = b.add_intersection(LatLon::new(-0.001, 0.0), None);
        let along = b.add_segment(SegmentSpec::two_way(x, east, main, 10.0)).unwrap();
        b.add_segment(SegmentSpec::two_way(x, north, first, 10.0)).unwrap();
        b.add_segment(SegmentSpec::two_way(x, south, second, 10.0)).unwrap();
        let map = b.build();

        let lines = directions(&map, x, &[along]);
        assert_eq!(lines[0], "Begin the route on Main Street and Second Avenue.");
    }
}
