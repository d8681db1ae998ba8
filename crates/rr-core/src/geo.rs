//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` uses `f32` (single-precision) latitude/longitude.  At the
//! equator this gives ~1 m precision — more than sufficient for road routing
//! while halving memory consumption vs. `f64`.
//!
//! Bearings are compass headings in degrees: 0° = North, 90° = East,
//! normalised to the half-open range [-180, 180).  Turn angles use the same
//! range with negative values meaning "left".

/// A WGS-84 geographic coordinate stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accuracy: ±0.5 % (f32 rounding); suitable for edge costs and the A*
    /// lower bound, both of which tolerate small relative error.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Compass bearing from `self` towards `other`, in degrees in
    /// [-180, 180).  0° = due North, +90° = due East.
    pub fn bearing_deg(self, other: GeoPoint) -> f32 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        normalize_deg(y.atan2(x).to_degrees())
    }

    /// Project `self` onto the great-circle chord `a`–`b`, treating the local
    /// area as planar (longitude scaled by cos(latitude)).
    ///
    /// Returns the clamped parameter `t` in [0, 1] along `a`→`b` and the
    /// projected point.  Adequate for snapping waypoints onto segments a few
    /// kilometres long.
    pub fn project_onto(self, a: GeoPoint, b: GeoPoint) -> (f32, GeoPoint) {
        let scale = (a.lat.to_radians().cos()).max(0.01);

        let px = (self.lon - a.lon) * scale;
        let py = self.lat - a.lat;
        let ex = (b.lon - a.lon) * scale;
        let ey = b.lat - a.lat;

        let len2 = ex * ex + ey * ey;
        let t = if len2 == 0.0 {
            0.0
        } else {
            ((px * ex + py * ey) / len2).clamp(0.0, 1.0)
        };

        let point = GeoPoint::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon));
        (t, point)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Angle helpers ─────────────────────────────────────────────────────────────

/// Normalise an angle in degrees to [-180, 180).
#[inline]
pub fn normalize_deg(mut deg: f32) -> f32 {
    while deg < -180.0 {
        deg += 360.0;
    }
    while deg >= 180.0 {
        deg -= 360.0;
    }
    deg
}

/// The turn made at a node: the signed difference between the outbound and
/// inbound bearings, in [-180, 180).  Negative = left, positive = right,
/// 0 = straight on.
#[inline]
pub fn turn_angle_deg(inbound_bearing: f32, outbound_bearing: f32) -> f32 {
    normalize_deg(outbound_bearing - inbound_bearing)
}
