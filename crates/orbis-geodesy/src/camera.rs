//! Camera model used to cast viewport rays at the globe.

use glam::{DMat3, DQuat, DVec3};

use crate::Ray;

/// Anything that can turn a viewport coordinate into a world-space ray.
///
/// Viewport coordinates are in `[0, 1]²` with `(0, 0)` at the bottom-left and
/// `(1, 1)` at the top-right of the screen.
pub trait ViewportCamera {
    /// World-space camera position.
    fn position(&self) -> DVec3;

    /// World-space ray from the camera through the viewport point `(vx, vy)`.
    fn viewport_point_to_ray(&self, vx: f64, vy: f64) -> Ray;
}

/// A pinhole perspective camera in double precision.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Position in world space.
    pub position: DVec3,
    /// Rotation as a unit quaternion. The camera looks down its local `-Z`.
    pub rotation: DQuat,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Width / height.
    pub aspect_ratio: f64,
}

impl PerspectiveCamera {
    /// Create a camera at `position` looking at `target` with `+Y` as up.
    #[must_use]
    pub fn looking_at(position: DVec3, target: DVec3, fov_y: f64, aspect_ratio: f64) -> Self {
        Self {
            position,
            rotation: look_rotation(target - position, DVec3::Y),
            fov_y,
            aspect_ratio,
        }
    }

    /// The forward direction vector (`-Z` in camera space).
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// The up direction vector (`+Y` in camera space).
    #[must_use]
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// The right direction vector (`+X` in camera space).
    #[must_use]
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Update the aspect ratio from a viewport size.
    pub fn set_aspect_ratio(&mut self, width: f64, height: f64) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl ViewportCamera for PerspectiveCamera {
    fn position(&self) -> DVec3 {
        self.position
    }

    fn viewport_point_to_ray(&self, vx: f64, vy: f64) -> Ray {
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect_ratio;
        let local = DVec3::new(
            (2.0 * vx - 1.0) * half_width,
            (2.0 * vy - 1.0) * half_height,
            -1.0,
        );
        Ray::new(self.position, self.rotation * local)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::looking_at(
            DVec3::new(0.0, 0.0, -300.0),
            DVec3::ZERO,
            60f64.to_radians(),
            16.0 / 9.0,
        )
    }
}

/// Rotation that points local `-Z` along `forward` with local `+Y` as close to
/// `up` as possible.
#[must_use]
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    let Some(f) = forward.try_normalize() else {
        return DQuat::IDENTITY;
    };
    let right = f
        .cross(up)
        .try_normalize()
        .or_else(|| f.cross(DVec3::Z).try_normalize())
        .unwrap_or(DVec3::X);
    let true_up = right.cross(f);
    DQuat::from_mat3(&DMat3::from_cols(right, true_up, -f)).normalize()
}
