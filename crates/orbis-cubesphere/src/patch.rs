//! Grid mesh generation for a single face region.

use glam::DVec3;

use crate::{FaceRegion, ProjectionMethod, project};

/// A `resolution × resolution` vertex grid warped onto the unit sphere.
///
/// Produced fresh every tick and handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPatch {
    /// Which region this patch covers.
    pub region: FaceRegion,
    /// Grid resolution (vertices per side).
    pub resolution: u32,
    /// Vertex positions on the unit sphere, row-major.
    pub vertices: Vec<DVec3>,
    /// Triangle indices, two triangles per grid quad.
    pub triangles: Vec<u32>,
}

impl MeshPatch {
    /// Build the grid for `region`.
    ///
    /// Resolutions below 2 are raised to 2 so every patch has at least one quad.
    #[must_use]
    pub fn generate(region: &FaceRegion, resolution: u32, method: ProjectionMethod) -> Self {
        let res = resolution.max(2);
        let n = res as usize;
        let step = 2.0 / f64::from(res - 1);

        let mut vertices = Vec::with_capacity(n * n);
        let mut triangles = Vec::with_capacity((n - 1) * (n - 1) * 6);

        for y in 0..res {
            let t = f64::from(y) * step - 1.0;
            for x in 0..res {
                let s = f64::from(x) * step - 1.0;
                vertices.push(project(region.cube_point(s, t), method));

                if x != res - 1 && y != res - 1 {
                    let i = x + y * res;
                    triangles.extend_from_slice(&[
                        i,
                        i + res + 1,
                        i + res,
                        i,
                        i + 1,
                        i + res + 1,
                    ]);
                }
            }
        }

        Self {
            region: *region,
            resolution: res,
            vertices,
            triangles,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Vertices scaled to a sphere of `radius`, narrowed to `f32` for upload.
    #[must_use]
    pub fn scaled_positions(&self, radius: f64) -> Vec<[f32; 3]> {
        self.vertices
            .iter()
            .map(|v| (*v * radius).as_vec3().to_array())
            .collect()
    }
}
