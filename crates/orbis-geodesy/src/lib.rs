//! Viewport geodesy for a globe viewer.
//!
//! Casts camera rays at a sphere in double precision, expresses the hits as
//! longitude/latitude-bearing surface points in the globe's canonical frame,
//! and packages them into a per-frame [`ViewportFrame`].

mod camera;
mod geo_point;
mod globe;
mod ray;
mod viewport;

pub use camera::{PerspectiveCamera, ViewportCamera, look_rotation};
pub use geo_point::{GeoPoint, UNIT_TOLERANCE};
pub use globe::GlobeTransform;
pub use ray::{Ray, SphereHit, intersect_sphere_ray};
pub use viewport::{POLE_EPSILON, ViewportFrame, ViewportSample, is_pole_visible};
