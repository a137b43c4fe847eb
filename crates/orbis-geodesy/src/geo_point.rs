//! Unit-sphere surface points and their geographic coordinates.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;

/// Tolerance on `|p| - 1` accepted by [`GeoPoint::is_normalized`].
pub const UNIT_TOLERANCE: f64 = 1e-6;

/// A point on the globe's surface, stored as a unit vector in the globe's
/// canonical (un-rotated) frame.
///
/// Longitude is measured from `-Z` towards `+X`, so `(0, 0, -1)` is
/// `(lon = 0, lat = 0)` and `+Y` is the north pole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint(DVec3);

impl GeoPoint {
    /// Normalize `v` onto the unit sphere. Returns `None` for a zero or
    /// non-finite vector.
    #[must_use]
    pub fn new(v: DVec3) -> Option<Self> {
        v.try_normalize().map(Self)
    }

    /// Wrap a vector the caller already knows to be unit length.
    #[must_use]
    pub fn from_unit(v: DVec3) -> Self {
        debug_assert!(
            (v.length() - 1.0).abs() < UNIT_TOLERANCE,
            "not a unit vector: {v:?}"
        );
        Self(v)
    }

    /// Build the surface point at the given longitude/latitude (radians).
    #[must_use]
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();
        Self(DVec3::new(cos_lat * sin_lon, sin_lat, -cos_lat * cos_lon))
    }

    /// The underlying unit vector.
    #[inline]
    #[must_use]
    pub fn vector(self) -> DVec3 {
        self.0
    }

    /// Longitude in radians, in `(-π, π]`.
    #[must_use]
    pub fn longitude(self) -> f64 {
        let lon = self.0.x.atan2(-self.0.z);
        // atan2 yields -π for (−0, −x); fold it onto the closed end.
        if lon <= -PI { PI } else { lon }
    }

    /// Latitude in radians, in `[-π/2, π/2]`.
    #[must_use]
    pub fn latitude(self) -> f64 {
        self.0.y.clamp(-1.0, 1.0).asin().clamp(-FRAC_PI_2, FRAC_PI_2)
    }

    /// `(longitude, latitude)` in radians.
    #[must_use]
    pub fn lon_lat(self) -> (f64, f64) {
        (self.longitude(), self.latitude())
    }

    /// Cosine of the angle between two surface points.
    #[inline]
    #[must_use]
    pub fn dot(self, other: GeoPoint) -> f64 {
        self.0.dot(other.0)
    }

    /// Whether the stored vector is unit length within [`UNIT_TOLERANCE`].
    #[must_use]
    pub fn is_normalized(self) -> bool {
        (self.0.length() - 1.0).abs() < UNIT_TOLERANCE
    }
}
