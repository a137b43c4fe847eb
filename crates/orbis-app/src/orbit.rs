//! A camera that circles the globe, standing in for user input in the
//! headless demo.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec3;
use orbis_geodesy::{GeoPoint, GlobeTransform, PerspectiveCamera};

/// Keeps the camera away from the poles, where the `+Y` up vector degenerates.
const MAX_LATITUDE: f64 = FRAC_PI_2 - 0.05;

/// Camera orbiting the globe center at a fixed distance.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Distance from the globe center.
    pub distance: f64,
    /// Sub-camera longitude in radians.
    pub longitude: f64,
    /// Sub-camera latitude in radians.
    pub latitude: f64,
    /// Longitude change per second.
    pub angular_speed: f64,
    /// Distance change per second; negative zooms in.
    pub approach_speed: f64,
    /// Closest allowed distance.
    pub min_distance: f64,
    pub fov_y: f64,
    pub aspect_ratio: f64,
}

impl OrbitCamera {
    /// Start above `(longitude, latitude)` at `distance`.
    #[must_use]
    pub fn new(distance: f64, longitude: f64, latitude: f64, fov_y: f64, aspect_ratio: f64) -> Self {
        Self {
            distance,
            longitude,
            latitude: latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            angular_speed: 0.2,
            approach_speed: 0.0,
            min_distance: 0.0,
            fov_y,
            aspect_ratio,
        }
    }

    /// Move along the orbit by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.longitude = (self.longitude + self.angular_speed * dt).rem_euclid(TAU);
        self.distance = (self.distance + self.approach_speed * dt).max(self.min_distance);
    }

    /// World-space camera looking at the globe center.
    #[must_use]
    pub fn camera(&self, globe: &GlobeTransform) -> PerspectiveCamera {
        let direction = GeoPoint::from_lon_lat(self.longitude, self.latitude).vector();
        let position = globe.position + globe.rotation * (direction * self.distance);
        PerspectiveCamera::looking_at(position, globe.position, self.fov_y, self.aspect_ratio)
    }

    /// Where the camera currently is, relative to the globe center.
    #[must_use]
    pub fn offset(&self) -> DVec3 {
        GeoPoint::from_lon_lat(self.longitude, self.latitude).vector() * self.distance
    }
}
