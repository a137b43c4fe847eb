//! Viewport-adaptive cube-sphere meshing.
//!
//! Every tick the six root faces are split into quadrants, but only where the
//! viewport overlaps them, until a depth is reached at which the visible part
//! of the sphere carries roughly the requested number of vertices. Each
//! surviving region at that depth becomes one [`MeshPatch`].

use std::f64::consts::{PI, TAU};

use orbis_geodesy::ViewportFrame;
use tracing::{debug, trace};

use crate::{CubeFace, FaceRegion, MeshPatch, ProjectionMethod, should_render};

/// Hard ceiling on the splitting count regardless of configuration.
pub const MAX_SPLITTING_COUNT: u32 = 10;

/// How far above the target the visible vertex total may land. One extra
/// level quadruples the patch count, and culling keeps the patches that only
/// touch the view edge.
pub const MAX_TARGET_OVERSHOOT: u64 = 6;

/// Tunables for [`AdaptiveMesher`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MesherSettings {
    /// Vertices per patch side.
    pub resolution: u32,
    /// Vertex count the visible part of the sphere should reach.
    pub target_vertices: u64,
    /// Upper bound on the splitting count, clamped to [`MAX_SPLITTING_COUNT`].
    pub max_splitting_count: u32,
    /// Cube-to-sphere warp.
    pub projection: ProjectionMethod,
}

impl Default for MesherSettings {
    fn default() -> Self {
        Self {
            resolution: 10,
            target_vertices: 40_000,
            max_splitting_count: MAX_SPLITTING_COUNT,
            projection: ProjectionMethod::Everitt,
        }
    }
}

/// Builds the visible cube-sphere patches for a viewport.
#[derive(Clone, Debug, Default)]
pub struct AdaptiveMesher {
    settings: MesherSettings,
}

impl AdaptiveMesher {
    /// Create a mesher with the given settings.
    pub fn new(settings: MesherSettings) -> Self {
        Self { settings }
    }

    /// Current settings.
    pub fn settings(&self) -> &MesherSettings {
        &self.settings
    }

    /// Replace the settings (e.g. after a config reload).
    pub fn set_settings(&mut self, settings: MesherSettings) {
        self.settings = settings;
    }

    fn depth_ceiling(&self) -> u32 {
        self.settings.max_splitting_count.clamp(1, MAX_SPLITTING_COUNT)
    }

    /// Linear fraction of the globe spanned by the viewport, in `(0, 1]`.
    ///
    /// Taken from the longitude and latitude spans between the top-right and
    /// bottom-left corners. Any corner off the globe gives `1.0`, since
    /// culling then keeps every region.
    #[must_use]
    pub fn coverage_fraction(frame: &ViewportFrame) -> f64 {
        if !frame.all_corners_defined() {
            return 1.0;
        }
        let (Some(top_right), Some(bottom_left)) = (frame.top_right, frame.bottom_left) else {
            return 1.0;
        };

        let mut lon_span = (top_right.longitude() - bottom_left.longitude()).abs();
        if lon_span > PI {
            lon_span = TAU - lon_span;
        }
        let lat_span = (top_right.latitude() - bottom_left.latitude()).abs();

        (lon_span / TAU).max(lat_span / PI).min(1.0)
    }

    /// Smallest splitting count whose estimated visible vertex count
    /// `6 · 4^(D−1) · resolution² · f²` reaches the target, capped at the
    /// configured ceiling.
    #[must_use]
    pub fn splitting_count(&self, frame: &ViewportFrame) -> u32 {
        let ceiling = self.depth_ceiling();
        let fraction = Self::coverage_fraction(frame);
        let target = self.settings.target_vertices as f64;
        let res = f64::from(self.settings.resolution.max(2));

        let mut depth = 1;
        while depth < ceiling {
            let patches = 6.0 * 4f64.powi(depth as i32 - 1);
            if patches * res * res * fraction * fraction >= target {
                break;
            }
            depth += 1;
        }
        depth
    }

    /// Regions that survive culling at `splitting_count`, in face order.
    #[must_use]
    pub fn visible_regions(&self, frame: &ViewportFrame, splitting_count: u32) -> Vec<FaceRegion> {
        let leaf_depth = splitting_count.clamp(1, self.depth_ceiling()) - 1;
        let method = self.settings.projection;

        let mut leaves = Vec::new();
        let mut stack: Vec<FaceRegion> = CubeFace::ALL.iter().rev().map(|f| f.region()).collect();

        while let Some(region) = stack.pop() {
            if !should_render(&region, frame, method) {
                continue;
            }
            if region.depth >= leaf_depth {
                leaves.push(region);
            } else {
                // Reverse so children pop in split order.
                stack.extend(region.split().into_iter().rev());
            }
        }

        leaves
    }

    /// Mesh the visible sphere with an explicit splitting count.
    #[must_use]
    pub fn generate_with_splitting_count(
        &self,
        frame: &ViewportFrame,
        splitting_count: u32,
    ) -> Vec<MeshPatch> {
        let resolution = self.settings.resolution;
        let method = self.settings.projection;
        self.visible_regions(frame, splitting_count)
            .iter()
            .map(|region| MeshPatch::generate(region, resolution, method))
            .collect()
    }

    /// Mesh the visible sphere for this frame.
    #[must_use]
    pub fn generate(&self, frame: &ViewportFrame) -> Vec<MeshPatch> {
        let splitting_count = self.splitting_count(frame);
        let patches = self.generate_with_splitting_count(frame, splitting_count);
        let vertices = total_vertices(&patches);
        trace!(splitting_count, patches = patches.len(), vertices, "cube-sphere meshed");

        let ceiling = self.settings.target_vertices.saturating_mul(MAX_TARGET_OVERSHOOT);
        if splitting_count > 1 && vertices as u64 > ceiling {
            debug!(vertices, target = self.settings.target_vertices, "mesh overshoots the vertex target");
        }
        patches
    }
}

/// Sum of vertex counts across patches.
#[must_use]
pub fn total_vertices(patches: &[MeshPatch]) -> usize {
    patches.iter().map(MeshPatch::vertex_count).sum()
}
