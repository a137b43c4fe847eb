//! Cube-to-sphere projection methods.
//!
//! Provides two projection approaches:
//! - **Everitt**: Analytic mapping with better area uniformity. The default.
//! - **Tangent warp**: Approximate equal-angle mapping via `tan(x * π/4)`
//!   remapping of the in-face coordinates followed by normalization.

use std::f64::consts::FRAC_PI_4;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::CubeFace;

/// Selects which cube-to-sphere projection method to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectionMethod {
    /// Tangent-warp projection: equal-angle, slightly less uniform in area.
    TangentWarp,
    /// Everitt/Mathworld analytic projection: better area uniformity.
    #[default]
    Everitt,
}

/// Analytic cube-to-sphere using the Everitt/Mathworld mapping.
///
/// Given a point on the cube surface (one coordinate is `±1`), compute the
/// corresponding unit sphere point with minimal area distortion:
///
/// ```text
/// sx = x * sqrt(1 - y²/2 - z²/2 + y²z²/3)
/// sy = y * sqrt(1 - x²/2 - z²/2 + x²z²/3)
/// sz = z * sqrt(1 - x²/2 - y²/2 + x²y²/3)
/// ```
#[inline]
#[must_use]
pub fn cube_to_sphere_everitt(cube_point: DVec3) -> DVec3 {
    let x2 = cube_point.x * cube_point.x;
    let y2 = cube_point.y * cube_point.y;
    let z2 = cube_point.z * cube_point.z;

    DVec3::new(
        cube_point.x * (1.0 - y2 / 2.0 - z2 / 2.0 + y2 * z2 / 3.0).sqrt(),
        cube_point.y * (1.0 - x2 / 2.0 - z2 / 2.0 + x2 * z2 / 3.0).sqrt(),
        cube_point.z * (1.0 - x2 / 2.0 - y2 / 2.0 + x2 * y2 / 3.0).sqrt(),
    )
}

/// Tangent-warp a point on the cube surface onto the unit sphere.
///
/// The two in-face coordinates are remapped through `tan(c * π/4)`, which is
/// the identity at `c = ±1` and spreads the interior, then the result is
/// normalized.
#[must_use]
pub fn cube_to_sphere_tangent(cube_point: DVec3) -> DVec3 {
    let face = CubeFace::from_direction(cube_point);
    let n = face.normal();
    let a = face.axis_a();
    let b = face.axis_b();

    let s = (cube_point.dot(a) * FRAC_PI_4).tan();
    let t = (cube_point.dot(b) * FRAC_PI_4).tan();

    (n + s * a + t * b).normalize_or_zero()
}

/// Project a point on the `[-1, 1]` cube onto the unit sphere using `method`.
#[inline]
#[must_use]
pub fn project(cube_point: DVec3, method: ProjectionMethod) -> DVec3 {
    match method {
        ProjectionMethod::TangentWarp => cube_to_sphere_tangent(cube_point),
        ProjectionMethod::Everitt => cube_to_sphere_everitt(cube_point),
    }
}
