//! Headless globe viewer.
//!
//! Ties the geodesy, mesher and tile crates together behind [`GlobeViewer`],
//! plus the platform and demo pieces the `orbis` binary needs.

mod error;
pub mod orbit;
pub mod platform;
pub mod synthetic;
pub mod viewer;

pub use error::AppError;
pub use orbit::OrbitCamera;
pub use platform::{PlatformDirs, PlatformError};
pub use synthetic::{synthetic_loader, synthetic_tile, tile_color};
pub use viewer::{AtlasUpdate, GlobeViewer, TickOutput, ViewerSettings};
