//! Synthetic downtown street grid.
//!
//! Three east–west streets crossed by four north–south ones, loosely
//! following the downtown Toronto core.  Bay Street runs one-way south and
//! Yonge Street one-way north; Front Street bends between Spadina and
//! University.

use sm_core::{IntersectionId, LatLon};
use sm_graph::{GraphResult, SegmentSpec, StreetMap, StreetMapBuilder};

const LATS: [f64; 3] = [43.6450, 43.6485, 43.6520];
const LONS: [f64; 4] = [-79.3950, -79.3870, -79.3800, -79.3770];

const EAST_WEST: [&str; 3] = ["Front Street", "King Street", "Queen Street"];
const NORTH_SOUTH: [&str; 4] = ["Spadina Avenue", "University Avenue", "Bay Street", "Yonge Street"];

/// Build the grid.
///
/// Returns `(map, g)` where `g[row][col]` is the intersection of
/// `EAST_WEST[row]` and `NORTH_SOUTH[col]`; row 0 is southmost, col 0
/// westmost.
pub fn build_downtown() -> GraphResult<(StreetMap, [[IntersectionId; 4]; 3])> {
    let mut b = StreetMapBuilder::with_capacity(12, 17);

    let g = [0, 1, 2].map(|r| {
        [0, 1, 2, 3].map(|c| {
            let name = format!("{} & {}", short(EAST_WEST[r]), short(NORTH_SOUTH[c]));
            b.add_intersection(LatLon::new(LATS[r], LONS[c]), Some(name))
        })
    });
    let east_west = EAST_WEST.map(|n| b.add_street(n));
    let north_south = NORTH_SOUTH.map(|n| b.add_street(n));

    // ~50 km/h everywhere except University Avenue (~60 km/h).
    const CITY: f64 = 13.9;
    const ARTERIAL: f64 = 16.7;

    for r in 0..3 {
        for c in 0..3 {
            let mut spec = SegmentSpec::two_way(g[r][c], g[r][c + 1], east_west[r], CITY);
            if r == 0 && c == 0 {
                spec = spec.with_curve_points(vec![LatLon::new(43.6443, -79.3910)]);
            }
            b.add_segment(spec)?;
        }
    }
    for r in 0..2 {
        b.add_segment(SegmentSpec::two_way(g[r][0], g[r + 1][0], north_south[0], CITY))?;
        b.add_segment(SegmentSpec::two_way(g[r][1], g[r + 1][1], north_south[1], ARTERIAL))?;
        b.add_segment(SegmentSpec::one_way(g[r + 1][2], g[r][2], north_south[2], CITY))?;
        b.add_segment(SegmentSpec::one_way(g[r][3], g[r + 1][3], north_south[3], CITY))?;
    }

    Ok((b.build(), g))
}

fn short(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}
