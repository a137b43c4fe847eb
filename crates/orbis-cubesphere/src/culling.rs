//! Viewport culling for face regions.
//!
//! Both the region and the viewport are approximated by spherical caps. A
//! region is kept when either cap reaches into the other. Undefined viewport
//! points (rays that missed the globe) make the test answer "visible".

use glam::DVec3;
use orbis_geodesy::{GeoPoint, ViewportFrame};

use crate::{FaceRegion, ProjectionMethod};

/// Whether `region` overlaps the viewport described by `frame`.
#[must_use]
pub fn should_render(region: &FaceRegion, frame: &ViewportFrame, method: ProjectionMethod) -> bool {
    let region_center = region.sphere_center(method);
    let region_corners = region.sphere_corners(method);
    let viewport_corners = frame.corners();

    viewport_corner_in_region(region_center, &region_corners, &viewport_corners)
        || region_corner_in_viewport(&region_corners, frame.center, &viewport_corners)
}

/// Any viewport corner lies angularly closer to the region center than the
/// region's own farthest corner.
fn viewport_corner_in_region(
    region_center: DVec3,
    region_corners: &[DVec3; 4],
    viewport_corners: &[Option<GeoPoint>; 4],
) -> bool {
    let extent = region_corners
        .iter()
        .map(|c| c.dot(region_center))
        .fold(f64::INFINITY, f64::min);

    viewport_corners.iter().any(|corner| match corner {
        Some(p) => p.vector().dot(region_center) > extent,
        None => true,
    })
}

/// Any region corner lies angularly closer to the viewport center than the
/// viewport's own farthest corner.
fn region_corner_in_viewport(
    region_corners: &[DVec3; 4],
    viewport_center: Option<GeoPoint>,
    viewport_corners: &[Option<GeoPoint>; 4],
) -> bool {
    let Some(center) = viewport_center else {
        return true;
    };

    let mut extent = f64::INFINITY;
    for corner in viewport_corners {
        match corner {
            Some(p) => extent = extent.min(p.dot(center)),
            None => return true,
        }
    }

    region_corners
        .iter()
        .any(|c| c.dot(center.vector()) > extent)
}
