//! Command-line argument parsing for the orbis viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Adaptive cube-sphere globe viewer")]
pub struct CliArgs {
    /// Vertices per mesh patch side.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Target vertex count for the visible globe.
    #[arg(long)]
    pub target_vertices: Option<u64>,

    /// Globe radius in world units.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Starting tile zoom.
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Number of ticks to run before exiting.
    #[arg(long, default_value_t = 120)]
    pub ticks: u32,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(resolution) = args.resolution {
            self.mesh.resolution = resolution;
        }
        if let Some(target) = args.target_vertices {
            self.mesh.target_vertices = target;
        }
        if let Some(radius) = args.radius {
            self.globe.radius = radius;
        }
        if let Some(zoom) = args.zoom {
            self.tiles.initial_zoom = zoom;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
