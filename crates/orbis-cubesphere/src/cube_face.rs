//! The six root faces of the cube-sphere and their basis vectors.

use glam::DVec3;

use crate::FaceRegion;

/// The six faces of the cube that forms the cube-sphere.
///
/// Each variant corresponds to a face whose outward normal points
/// along the named axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// First in-plane axis: the normal's components rotated one slot,
    /// `(n.y, n.z, n.x)`.
    #[must_use]
    pub fn axis_a(self) -> DVec3 {
        let n = self.normal();
        DVec3::new(n.y, n.z, n.x)
    }

    /// Second in-plane axis, `normal × axis_a`, so that
    /// `axis_a × axis_b == normal`.
    #[must_use]
    pub fn axis_b(self) -> DVec3 {
        self.normal().cross(self.axis_a())
    }

    /// The whole face as an unsplit region.
    #[must_use]
    pub fn region(self) -> FaceRegion {
        FaceRegion::root(self)
    }

    /// The face a direction points through.
    ///
    /// Picks the axis with the largest absolute component. Ties are broken by
    /// a fixed priority: X > Y > Z, positive > negative. A zero vector maps to
    /// [`CubeFace::PosX`].
    #[must_use]
    pub fn from_direction(dir: DVec3) -> CubeFace {
        let ax = dir.x.abs();
        let ay = dir.y.abs();
        let az = dir.z.abs();

        if ax >= ay && ax >= az {
            if dir.x >= 0.0 {
                CubeFace::PosX
            } else {
                CubeFace::NegX
            }
        } else if ay >= az {
            if dir.y >= 0.0 {
                CubeFace::PosY
            } else {
                CubeFace::NegY
            }
        } else if dir.z >= 0.0 {
            CubeFace::PosZ
        } else {
            CubeFace::NegZ
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normals_are_unit_length() {
        for face in CubeFace::ALL {
            let n = face.normal();
            assert!(
                (n.length() - 1.0).abs() < 1e-12,
                "Normal for {face:?} is not unit length: {}",
                n.length()
            );
        }
    }

    #[test]
    fn test_axis_a_cross_axis_b_equals_normal() {
        for face in CubeFace::ALL {
            let cross = face.axis_a().cross(face.axis_b());
            let n = face.normal();
            assert!(
                (cross - n).length() < 1e-12,
                "axis_a x axis_b != normal for {face:?}: got {cross:?}, expected {n:?}"
            );
        }
    }

    #[test]
    fn test_axes_are_unit_and_perpendicular() {
        for face in CubeFace::ALL {
            let (a, b, n) = (face.axis_a(), face.axis_b(), face.normal());
            assert!((a.length() - 1.0).abs() < 1e-12, "axis_a not unit for {face:?}");
            assert!((b.length() - 1.0).abs() < 1e-12, "axis_b not unit for {face:?}");
            assert!(a.dot(n).abs() < 1e-12, "axis_a not perpendicular for {face:?}");
            assert!(b.dot(n).abs() < 1e-12, "axis_b not perpendicular for {face:?}");
            assert!(a.dot(b).abs() < 1e-12, "axes not perpendicular for {face:?}");
        }
    }

    #[test]
    fn test_from_direction_recovers_normals() {
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_direction(face.normal() * 3.0), face);
            let tilted = face.normal() + 0.4 * face.axis_a() - 0.3 * face.axis_b();
            assert_eq!(CubeFace::from_direction(tilted), face);
        }
    }

    #[test]
    fn test_from_direction_zero_is_pos_x() {
        assert_eq!(CubeFace::from_direction(DVec3::ZERO), CubeFace::PosX);
    }
}
