//! Square regions of a cube face, split recursively into quadrants.

use glam::DVec3;

use crate::{CubeFace, ProjectionMethod, project};

/// A square patch of a cube face.
///
/// `center` is the patch center on the surface of the `[-1, 1]` cube and the
/// two axes are half-extent vectors, so the corners are
/// `center ± axis_a ± axis_b`. A root region has `center == face.normal()` and
/// unit axes; each split halves both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceRegion {
    /// The root face this region belongs to.
    pub face: CubeFace,
    /// Center of the region on the cube surface.
    pub center: DVec3,
    /// Half-extent along the face's first axis.
    pub axis_a: DVec3,
    /// Half-extent along the face's second axis.
    pub axis_b: DVec3,
    /// Number of splits from the root face (0 for the root).
    pub depth: u32,
}

impl FaceRegion {
    /// The entire face.
    #[must_use]
    pub fn root(face: CubeFace) -> Self {
        Self {
            face,
            center: face.normal(),
            axis_a: face.axis_a(),
            axis_b: face.axis_b(),
            depth: 0,
        }
    }

    /// Split into four quadrants with halved axes.
    ///
    /// Children are ordered `[(-a, -b), (+a, -b), (-a, +b), (+a, +b)]`.
    #[must_use]
    pub fn split(&self) -> [FaceRegion; 4] {
        let half_a = self.axis_a * 0.5;
        let half_b = self.axis_b * 0.5;
        let child = |sa: f64, sb: f64| FaceRegion {
            face: self.face,
            center: self.center + sa * half_a + sb * half_b,
            axis_a: half_a,
            axis_b: half_b,
            depth: self.depth + 1,
        };
        [
            child(-1.0, -1.0),
            child(1.0, -1.0),
            child(-1.0, 1.0),
            child(1.0, 1.0),
        ]
    }

    /// Point on the cube at local coordinates `(s, t)` in `[-1, 1]²`.
    #[inline]
    #[must_use]
    pub fn cube_point(&self, s: f64, t: f64) -> DVec3 {
        self.center + s * self.axis_a + t * self.axis_b
    }

    /// The four cube-surface corners, in the same order as [`split`](Self::split).
    #[must_use]
    pub fn cube_corners(&self) -> [DVec3; 4] {
        [
            self.cube_point(-1.0, -1.0),
            self.cube_point(1.0, -1.0),
            self.cube_point(-1.0, 1.0),
            self.cube_point(1.0, 1.0),
        ]
    }

    /// Region center projected onto the unit sphere.
    #[must_use]
    pub fn sphere_center(&self, method: ProjectionMethod) -> DVec3 {
        project(self.center, method)
    }

    /// Region corners projected onto the unit sphere.
    #[must_use]
    pub fn sphere_corners(&self, method: ProjectionMethod) -> [DVec3; 4] {
        self.cube_corners().map(|c| project(c, method))
    }

    /// Length of one side on the cube (2 for a root face).
    #[must_use]
    pub fn side_length(&self) -> f64 {
        2.0 * self.axis_a.length()
    }
}
