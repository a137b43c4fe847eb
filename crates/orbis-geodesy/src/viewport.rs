//! Per-frame viewport snapshot: where the screen's reference rays land on the
//! globe, and whether either pole can be seen.

use glam::DVec3;
use tracing::warn;

use crate::{GeoPoint, GlobeTransform, Ray, ViewportCamera};

/// One of the seven viewport reference points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportSample {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Middle of the top edge.
    TopCenter,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Center of the screen.
    Center,
}

impl ViewportSample {
    /// All samples in evaluation order.
    pub const ALL: [ViewportSample; 7] = [
        ViewportSample::TopLeft,
        ViewportSample::TopRight,
        ViewportSample::BottomLeft,
        ViewportSample::BottomRight,
        ViewportSample::TopCenter,
        ViewportSample::BottomCenter,
        ViewportSample::Center,
    ];

    /// Viewport coordinate of this sample, `(0, 0)` at bottom-left.
    #[must_use]
    pub fn viewport_coord(self) -> (f64, f64) {
        match self {
            ViewportSample::TopLeft => (0.0, 1.0),
            ViewportSample::TopRight => (1.0, 1.0),
            ViewportSample::BottomLeft => (0.0, 0.0),
            ViewportSample::BottomRight => (1.0, 0.0),
            ViewportSample::TopCenter => (0.5, 1.0),
            ViewportSample::BottomCenter => (0.5, 0.0),
            ViewportSample::Center => (0.5, 0.5),
        }
    }
}

/// Where the viewport's reference rays hit the globe this frame.
///
/// Each point is `None` when its ray misses the sphere (the screen extends past
/// the globe's silhouette there). Rebuilt every tick; never cached.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportFrame {
    pub top_left: Option<GeoPoint>,
    pub top_right: Option<GeoPoint>,
    pub bottom_left: Option<GeoPoint>,
    pub bottom_right: Option<GeoPoint>,
    pub top_center: Option<GeoPoint>,
    pub bottom_center: Option<GeoPoint>,
    /// Where the screen center lands; drives change detection and culling.
    pub center: Option<GeoPoint>,
    /// The north pole is on the near hemisphere as seen from the camera.
    pub north_pole_visible: bool,
    /// The south pole is on the near hemisphere as seen from the camera.
    pub south_pole_visible: bool,
}

impl ViewportFrame {
    /// Cast all seven reference rays and test both poles.
    pub fn compute(camera: &impl ViewportCamera, globe: &GlobeTransform) -> Self {
        let sample = |s: ViewportSample| {
            let (vx, vy) = s.viewport_coord();
            globe.cast(&camera.viewport_point_to_ray(vx, vy))
        };

        Self {
            top_left: sample(ViewportSample::TopLeft),
            top_right: sample(ViewportSample::TopRight),
            bottom_left: sample(ViewportSample::BottomLeft),
            bottom_right: sample(ViewportSample::BottomRight),
            top_center: sample(ViewportSample::TopCenter),
            bottom_center: sample(ViewportSample::BottomCenter),
            center: sample(ViewportSample::Center),
            north_pole_visible: is_pole_visible(camera.position(), globe, DVec3::Y),
            south_pole_visible: is_pole_visible(camera.position(), globe, DVec3::NEG_Y),
        }
    }

    /// A frame in which every ray missed the globe. Consumers treat this as
    /// "everything may be visible".
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// The point for one reference sample.
    #[must_use]
    pub fn get(&self, sample: ViewportSample) -> Option<GeoPoint> {
        match sample {
            ViewportSample::TopLeft => self.top_left,
            ViewportSample::TopRight => self.top_right,
            ViewportSample::BottomLeft => self.bottom_left,
            ViewportSample::BottomRight => self.bottom_right,
            ViewportSample::TopCenter => self.top_center,
            ViewportSample::BottomCenter => self.bottom_center,
            ViewportSample::Center => self.center,
        }
    }

    /// The four screen corners, in `[top_left, top_right, bottom_left, bottom_right]` order.
    #[must_use]
    pub fn corners(&self) -> [Option<GeoPoint>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// The six edge samples used for tile ranging: four corners plus the top
    /// and bottom mid-edge points.
    #[must_use]
    pub fn edge_samples(&self) -> [Option<GeoPoint>; 6] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
            self.top_center,
            self.bottom_center,
        ]
    }

    /// Either pole can be seen.
    #[must_use]
    pub fn any_pole_visible(&self) -> bool {
        self.north_pole_visible || self.south_pole_visible
    }

    /// Every corner ray hit the globe.
    #[must_use]
    pub fn all_corners_defined(&self) -> bool {
        self.corners().iter().all(Option::is_some)
    }
}

/// Relative tolerance between a pole and the nearest hit along the ray aimed
/// at it.
pub const POLE_EPSILON: f64 = 1e-4;

/// Whether the pole in canonical direction `pole_direction` (`±Y`) is the
/// nearest thing on the globe along the camera's line of sight to it.
///
/// The ray is aimed at a point on the sphere, so it should always hit; a miss
/// is logged and treated as "not visible".
pub fn is_pole_visible(camera_position: DVec3, globe: &GlobeTransform, pole_direction: DVec3) -> bool {
    let pole = globe.surface_offset(pole_direction);
    let origin = camera_position - globe.position;
    let ray = Ray::towards(origin, pole);

    let Some(hit) = ray.intersect_sphere(globe.radius) else {
        warn!(
            ?pole_direction,
            "pole ray missed the globe; treating the pole as hidden"
        );
        return false;
    };

    hit.point.distance(pole) < POLE_EPSILON * globe.radius.max(1.0)
}
