//! Rays and ray/sphere intersection in double precision.

use glam::DVec3;

/// A half-line `origin + t * direction` with `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero direction is kept as-is; such a ray never intersects anything.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from `origin` through `target`.
    #[must_use]
    pub fn towards(origin: DVec3, target: DVec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// The point at parameter `t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }
}

/// The nearer intersection of a ray with a sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereHit {
    /// Ray parameter of the hit, always `>= 0`.
    pub t: f64,
    /// Hit position in the sphere's frame (`|point| == radius`).
    pub point: DVec3,
}

/// Intersect a ray with the sphere of `radius` centered at the origin.
///
/// Solves `a·t² + b·t + c = 0` with `a = |d|²`, `b = 2(o·d)`,
/// `c = |o|² − r²`. Returns `None` when the discriminant is negative or
/// when the whole sphere lies behind the ray origin. From outside the
/// sphere the smaller root is returned; from inside, the exit point.
#[must_use]
pub fn intersect_sphere_ray(origin: DVec3, direction: DVec3, radius: f64) -> Option<SphereHit> {
    let a = direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * origin.dot(direction);
    let c = origin.length_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = (-b - root) / (2.0 * a);
    let far = (-b + root) / (2.0 * a);

    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };

    Some(SphereHit {
        t,
        point: origin + t * direction,
    })
}

impl Ray {
    /// Intersect this ray with the origin-centered sphere of `radius`.
    #[must_use]
    pub fn intersect_sphere(&self, radius: f64) -> Option<SphereHit> {
        intersect_sphere_ray(self.origin, self.direction, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_on_hit_returns_near_side() {
        let hit = intersect_sphere_ray(DVec3::new(0.0, 0.0, -300.0), DVec3::Z, 100.0).unwrap();
        assert!((hit.t - 200.0).abs() < 1e-9);
        assert!((hit.point - DVec3::new(0.0, 0.0, -100.0)).length() < 1e-9);
    }

    #[test]
    fn test_miss_returns_none() {
        let hit = intersect_sphere_ray(DVec3::new(0.0, 150.0, -300.0), DVec3::Z, 100.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_sphere_behind_origin_returns_none() {
        let hit = intersect_sphere_ray(DVec3::new(0.0, 0.0, -300.0), DVec3::NEG_Z, 100.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_origin_inside_uses_exit_point() {
        let hit = intersect_sphere_ray(DVec3::ZERO, DVec3::X, 5.0).unwrap();
        assert!((hit.point - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_direction_never_hits() {
        assert!(intersect_sphere_ray(DVec3::new(0.0, 0.0, -3.0), DVec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_unnormalized_direction_uses_full_quadratic() {
        // |d| = 2, so the hit parameter halves.
        let hit = intersect_sphere_ray(DVec3::new(0.0, 0.0, -300.0), DVec3::Z * 2.0, 100.0).unwrap();
        assert!((hit.t - 100.0).abs() < 1e-9);
        assert!((hit.point.length() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hits_lie_on_sphere_at_planetary_scale() {
        let radius = 6_371_000.0;
        let origin = DVec3::new(1.0e6, -2.0e6, -2.0e7);
        for i in -10..=10 {
            for j in -10..=10 {
                let target = DVec3::new(i as f64 * 5.0e5, j as f64 * 5.0e5, 0.0);
                let ray = Ray::towards(origin, target);
                if let Some(hit) = ray.intersect_sphere(radius) {
                    let rel = (hit.point.length() - radius).abs() / radius;
                    assert!(rel < 1e-6, "relative error {rel} for target {target:?}");
                    assert!(hit.t >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_aimed_rays_always_hit() {
        let origin = DVec3::new(40.0, 70.0, -250.0);
        let ray = Ray::towards(origin, DVec3::ZERO);
        let hit = ray.intersect_sphere(100.0).expect("ray aimed at center must hit");
        assert!((hit.point.length() - 100.0).abs() < 1e-9);
    }
}
