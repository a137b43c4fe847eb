//! Cube-sphere geometry: cube-to-sphere projection, face quadtree subdivision,
//! viewport culling and adaptive patch meshing.

mod cube_face;
mod culling;
mod face_region;
mod mesher;
mod patch;
mod projection;

pub use cube_face::CubeFace;
pub use culling::should_render;
pub use face_region::FaceRegion;
pub use mesher::{AdaptiveMesher, MAX_SPLITTING_COUNT, MAX_TARGET_OVERSHOOT, MesherSettings, total_vertices};
pub use patch::MeshPatch;
pub use projection::{ProjectionMethod, cube_to_sphere_everitt, cube_to_sphere_tangent, project};
