//! CSV map loader.
//!
//! A map is three CSV tables in one directory:
//!
//! ```csv
//! # intersections.csv
//! id,lat,lon,name
//! 0,43.6532,-79.3832,Queen & Yonge
//! 1,43.6545,-79.3807,
//!
//! # streets.csv
//! id,name
//! 0,Queen Street West
//!
//! # segments.csv
//! id,from,to,street,one_way,speed_limit,curve_points
//! 0,0,1,0,false,13.9,43.6538 -79.3820;43.6541 -79.3814
//! ```
//!
//! Ids must be dense and listed in order (row `n` has id `n`).  `name` may be
//! empty.  `speed_limit` is in m/s.  `curve_points` is a `;`-separated list
//! of `lat lon` pairs, empty for a straight segment.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use sm_core::{IntersectionId, LatLon, StreetId};

use crate::network::{SegmentSpec, StreetMap, StreetMapBuilder};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IntersectionRecord {
    id:   u32,
    lat:  f64,
    lon:  f64,
    name: Option<String>,
}

#[derive(Deserialize)]
struct StreetRecord {
    id:   u32,
    name: String,
}

#[derive(Deserialize)]
struct SegmentRecord {
    id:           u32,
    from:         u32,
    to:           u32,
    street:       u32,
    one_way:      bool,
    speed_limit:  f64,
    curve_points: Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `intersections.csv`, `streets.csv` and `segments.csv` from `dir`.
pub fn load_csv_dir(dir: &Path) -> GraphResult<StreetMap> {
    let map = load_readers(
        File::open(dir.join("intersections.csv"))?,
        File::open(dir.join("streets.csv"))?,
        File::open(dir.join("segments.csv"))?,
    )?;
    info!(dir = %dir.display(), "loaded street map");
    Ok(map)
}

/// Like [`load_csv_dir`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_readers<I: Read, S: Read, G: Read>(
    intersections: I,
    streets: S,
    segments: G,
) -> GraphResult<StreetMap> {
    let mut b = StreetMapBuilder::new();

    for (row, rec) in csv::Reader::from_reader(intersections)
        .deserialize::<IntersectionRecord>()
        .enumerate()
    {
        let rec = rec.map_err(|e| GraphError::Parse(e.to_string()))?;
        expect_dense("intersections", row, rec.id)?;
        let name = rec.name.filter(|n| !n.trim().is_empty());
        b.add_intersection(LatLon::new(rec.lat, rec.lon), name);
    }

    for (row, rec) in csv::Reader::from_reader(streets).deserialize::<StreetRecord>().enumerate() {
        let rec = rec.map_err(|e| GraphError::Parse(e.to_string()))?;
        expect_dense("streets", row, rec.id)?;
        b.add_street(rec.name);
    }

    for (row, rec) in csv::Reader::from_reader(segments).deserialize::<SegmentRecord>().enumerate() {
        let rec = rec.map_err(|e| GraphError::Parse(e.to_string()))?;
        expect_dense("segments", row, rec.id)?;
        let curve = match rec.curve_points.as_deref() {
            Some(s) => parse_curve_points(s)?,
            None => Vec::new(),
        };
        b.add_segment(SegmentSpec {
            from: IntersectionId(rec.from),
            to: IntersectionId(rec.to),
            street: StreetId(rec.street),
            one_way: rec.one_way,
            speed_limit: rec.speed_limit,
            curve_points: curve,
        })?;
    }

    Ok(b.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn expect_dense(table: &str, row: usize, id: u32) -> GraphResult<()> {
    if id as usize != row {
        return Err(GraphError::Parse(format!(
            "{table}: row {row} has id {id}; ids must be dense and in order"
        )));
    }
    Ok(())
}

fn parse_curve_points(s: &str) -> GraphResult<Vec<LatLon>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let mut it = pair.split_whitespace().map(str::parse::<f64>);
            match (it.next(), it.next(), it.next()) {
                (Some(Ok(lat)), Some(Ok(lon)), None) => Ok(LatLon::new(lat, lon)),
                _ => Err(GraphError::Parse(format!(
                    "invalid curve point {pair:?}: expected \"lat lon\""
                ))),
            }
        })
        .collect()
}
