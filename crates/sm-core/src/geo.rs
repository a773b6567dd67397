//! Geographic coordinates and the local planar projection.
//!
//! Distances use the equirectangular approximation: longitude is scaled by
//! the cosine of a reference latitude and the result treated as a flat
//! plane.  At city scale the error is well under 1 %.
//!
//! A [`Projection`] fixes the reference latitude for a whole map (the mean
//! latitude of its intersections) so every projected point lives in the same
//! Euclidean plane.  Segment lengths and the search heuristic are both
//! measured in that plane, which keeps the heuristic a true lower bound.

/// Mean earth radius used by the map database, in metres.
pub const EARTH_RADIUS_M: f64 = 6_372_797.560856;

/// A WGS-84 coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Equirectangular distance in metres, using the average latitude of the
    /// two points as the reference.
    pub fn distance_m(self, other: LatLon) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let cos_avg = ((lat1 + lat2) * 0.5).cos();

        let x1 = EARTH_RADIUS_M * self.lon.to_radians() * cos_avg;
        let y1 = EARTH_RADIUS_M * lat1;
        let x2 = EARTH_RADIUS_M * other.lon.to_radians() * cos_avg;
        let y2 = EARTH_RADIUS_M * lat2;

        ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A point in the map's local plane, in metres (x east, y north).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: PlanarPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Equirectangular projection around a fixed reference latitude.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    ref_lat_deg: f64,
    cos_ref: f64,
}

impl Projection {
    pub fn new(ref_lat_deg: f64) -> Self {
        Self { ref_lat_deg, cos_ref: ref_lat_deg.to_radians().cos() }
    }

    /// Projection centred on the mean latitude of `points`.  An empty input
    /// yields the equator.
    pub fn centred_on<I: IntoIterator<Item = LatLon>>(points: I) -> Self {
        let (sum, n) = points
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), p| (sum + p.lat, n + 1));
        if n == 0 {
            Self::new(0.0)
        } else {
            Self::new(sum / n as f64)
        }
    }

    pub fn reference_lat(&self) -> f64 {
        self.ref_lat_deg
    }

    #[inline]
    pub fn to_planar(&self, p: LatLon) -> PlanarPoint {
        PlanarPoint {
            x: p.lon.to_radians() * EARTH_RADIUS_M * self.cos_ref,
            y: p.lat.to_radians() * EARTH_RADIUS_M,
        }
    }

    #[inline]
    pub fn to_lat_lon(&self, p: PlanarPoint) -> LatLon {
        LatLon {
            lat: (p.y / EARTH_RADIUS_M).to_degrees(),
            lon: (p.x / (EARTH_RADIUS_M * self.cos_ref)).to_degrees(),
        }
    }
}
