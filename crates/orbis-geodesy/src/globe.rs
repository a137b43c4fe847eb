//! The globe's placement in world space.

use glam::{DQuat, DVec3};

use crate::{GeoPoint, Ray, SphereHit};

/// World-space placement of the globe: center, orientation, and uniform
/// scale (the sphere radius).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobeTransform {
    /// Globe center in world space.
    pub position: DVec3,
    /// Orientation of the globe's canonical frame.
    pub rotation: DQuat,
    /// Uniform scale, equal to the sphere radius.
    pub radius: f64,
}

impl GlobeTransform {
    /// A globe at `position` with identity orientation.
    #[must_use]
    pub fn new(position: DVec3, radius: f64) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
            radius,
        }
    }

    /// Replace the orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: DQuat) -> Self {
        self.rotation = rotation.normalize();
        self
    }

    /// Express a world ray relative to the globe center.
    ///
    /// Only the translation is removed; orientation is undone on the hit point
    /// so the quadratic runs against an axis-free sphere.
    #[must_use]
    pub fn to_centered_ray(&self, ray: &Ray) -> Ray {
        Ray {
            origin: ray.origin - self.position,
            direction: ray.direction,
        }
    }

    /// Intersect a world ray with the globe, returning the hit relative to the
    /// globe center (still in world orientation).
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<SphereHit> {
        self.to_centered_ray(ray).intersect_sphere(self.radius)
    }

    /// Cast a world ray at the globe and return the hit as a surface point in
    /// the globe's canonical frame.
    #[must_use]
    pub fn cast(&self, ray: &Ray) -> Option<GeoPoint> {
        let hit = self.intersect(ray)?;
        let unit = hit.point.try_normalize()?;
        GeoPoint::new(self.rotation.inverse() * unit)
    }

    /// World-space offset (from the globe center) of a canonical direction
    /// scaled to the surface.
    #[must_use]
    pub fn surface_offset(&self, canonical_direction: DVec3) -> DVec3 {
        self.rotation * (canonical_direction.normalize_or_zero() * self.radius)
    }

    /// World-space position of a canonical surface direction.
    #[must_use]
    pub fn surface_point(&self, canonical_direction: DVec3) -> DVec3 {
        self.position + self.surface_offset(canonical_direction)
    }
}

impl Default for GlobeTransform {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 100.0)
    }
}
