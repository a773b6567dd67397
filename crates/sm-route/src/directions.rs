//! Turn-by-turn directions for a finished path.
//!
//! A new instruction starts wherever the street id changes, the same rule
//! that charges a turn penalty.  Left/right is decided by the sign of a cross
//! product over the last shape point before the turn, the turning
//! intersection, and the first shape point after it.

use tracing::warn;

use sm_core::{IntersectionId, PlanarPoint, SegmentId};
use sm_graph::{StreetMap, StreetSegment};

use crate::path::path_intersections;

/// Cross products smaller than this (m²) read as straight on.
const STRAIGHT_TOLERANCE_M2: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Straight,
}

impl Turn {
    fn phrase(self) -> &'static str {
        match self {
            Turn::Left => "Turn left onto",
            Turn::Right => "Turn right onto",
            Turn::Straight => "Continue straight onto",
        }
    }
}

/// Classify the turn made at `link`, arriving from `pre` and leaving
/// towards `next`.  x points east and y north.
pub fn turn_direction(pre: PlanarPoint, link: PlanarPoint, next: PlanarPoint) -> Turn {
    let (ax, ay) = (link.x - pre.x, link.y - pre.y);
    let (bx, by) = (next.x - pre.x, next.y - pre.y);
    let cross = bx * ay - ax * by;
    if cross >= STRAIGHT_TOLERANCE_M2 {
        Turn::Right
    } else if cross <= -STRAIGHT_TOLERANCE_M2 {
        Turn::Left
    } else {
        Turn::Straight
    }
}

/// Plain-text directions for `path` driven from `start`, one instruction
/// per line.
///
/// ```text
/// Begin the route on Bay Street and King Street.
/// Continue down Bay Street for 250 metres.
/// Turn left onto Queen Street West.
/// Continue down Queen Street West for 80 metres to reach your destination.
/// ```
///
/// `start` is needed because a lone two-way segment does not say which way
/// it was driven.  The opening line names the last other street met in
/// `start`'s incidence list.  An empty path, or one that cannot be driven
/// from `start`, yields no lines.
pub fn directions(map: &StreetMap, start: IntersectionId, path: &[SegmentId]) -> Vec<String> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };
    let Some(nodes) = path_intersections(map, path, start) else {
        warn!(%start, segments = path.len(), "directions requested for an illegal path");
        return Vec::new();
    };

    let first_street = map.street_of(first);
    let cross_street = map
        .segments_of(start)
        .iter()
        .rev()
        .map(|&s| map.street_of(s))
        .find(|&s| s != first_street);

    let mut lines = Vec::new();
    lines.push(match cross_street {
        Some(other) => format!(
            "Begin the route on {} and {}.",
            map.street_name(first_street),
            map.street_name(other)
        ),
        None => format!("Begin the route on {}.", map.street_name(first_street)),
    });

    let mut street = first_street;
    let mut run_m = map.segment_length(first);

    for i in 1..path.len() {
        let seg = path[i];
        let next_street = map.street_of(seg);
        if next_street == street {
            run_m += map.segment_length(seg);
            continue;
        }

        lines.push(format!(
            "Continue down {} for {} metres.",
            map.street_name(street),
            run_m.round()
        ));
        let prev = map.segment(path[i - 1]);
        let cur = map.segment(seg);
        let turn = turn_at(map, prev, cur, nodes[i - 1], nodes[i]);
        lines.push(format!("{} {}.", turn.phrase(), map.street_name(next_street)));

        street = next_street;
        run_m = map.segment_length(seg);
    }

    lines.push(format!(
        "Continue down {} for {} metres to reach your destination.",
        map.street_name(street),
        run_m.round()
    ));
    lines
}

/// Turn made at `link` when leaving `prev` (entered at `prev_entry`) for `cur`.
fn turn_at(
    map: &StreetMap,
    prev: &StreetSegment,
    cur: &StreetSegment,
    prev_entry: IntersectionId,
    link: IntersectionId,
) -> Turn {
    let prev_line = map.segment_polyline(prev.id);
    let cur_line = map.segment_polyline(cur.id);

    // Shape point just before the link on the previous segment.
    let pre = if prev_entry == prev.from && link == prev.to {
        prev_line[prev_line.len() - 2]
    } else {
        prev_line[1]
    };
    // Shape point just after the link on the current segment.
    let next = if link == cur.from { cur_line[1] } else { cur_line[cur_line.len() - 2] };

    turn_direction(pre, map.point(link), next)
}
