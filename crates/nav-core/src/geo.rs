//! Geographic coordinate type and great-circle math.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  A walking user closes in on a
//! destination metre by metre, so the single-precision rounding that is fine
//! for city-scale routing would show up as jitter in the distance readout.
//!
//! All angles in and out of this module are degrees; radians never leak.

/// Mean Earth radius used by the haversine formula, metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of latitude on the sphere above.
const METRES_PER_DEG_LAT: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both coordinates are finite and inside the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial compass bearing (forward azimuth) from `self` to `to`, in
    /// `[0, 360)`.
    ///
    /// The bearing between identical points is undefined; it is reported as
    /// `0.0` ("straight ahead").
    pub fn bearing_deg(self, to: GeoPoint) -> f64 {
        if self == to {
            return 0.0;
        }
        let phi1 = self.lat.to_radians();
        let phi2 = to.lat.to_radians();
        let d_lon = (to.lon - self.lon).to_radians();

        let y = d_lon.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lon.cos();
        wrap_360(y.atan2(x).to_degrees())
    }

    /// Linear interpolation in coordinate space; `t = 0` is `self`, `t = 1`
    /// is `to`.  Good enough over campus-scale distances.
    pub fn lerp(self, to: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (to.lat - self.lat) * t,
            lon: self.lon + (to.lon - self.lon) * t,
        }
    }

    /// Shift by a local north/east displacement in metres (flat-earth
    /// approximation).
    pub fn offset_m(self, north_m: f64, east_m: f64) -> GeoPoint {
        let lat_scale = self.lat.to_radians().cos().max(1e-6);
        GeoPoint {
            lat: self.lat + north_m / METRES_PER_DEG_LAT,
            lon: self.lon + east_m / (METRES_PER_DEG_LAT * lat_scale),
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Haversine distance in metres.  Symmetric; zero iff `a == b`.
#[inline]
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    a.distance_m(b)
}

/// Forward azimuth from `from` to `to` in `[0, 360)`; `0.0` when degenerate.
#[inline]
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    from.bearing_deg(to)
}

/// How far clockwise the user must rotate from `heading` to face
/// `absolute_bearing`, in `[0, 360)`.
#[inline]
pub fn relative_bearing(absolute_bearing: f64, heading: f64) -> f64 {
    wrap_360(absolute_bearing - heading)
}

/// Normalise any angle into `[0, 360)`.
pub fn wrap_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Normalise any angle into `[-180, 180]`, the signed shortest rotation.
pub fn wrap_180(deg: f64) -> f64 {
    let mut d = wrap_360(deg);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}
