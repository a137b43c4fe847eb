//! Viewer settings persisted as `config.ron`.
//!
//! Every section falls back to its defaults when missing, so old files keep
//! loading. Command-line flags override the file for one run.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, DebugConfig, GlobeConfig, MeshConfig, TileConfig};
pub use error::ConfigError;
