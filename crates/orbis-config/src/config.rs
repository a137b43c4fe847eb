//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use orbis_cubesphere::ProjectionMethod;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cube-sphere meshing.
    pub mesh: MeshConfig,
    /// Tile pyramid and atlas.
    pub tiles: TileConfig,
    /// The globe itself.
    pub globe: GlobeConfig,
    /// Demo camera.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Cube-sphere mesh configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Vertices per patch side.
    pub resolution: u32,
    /// Vertex count the visible part of the globe should reach.
    pub target_vertices: u64,
    /// Maximum face splitting count (hard-capped at 10).
    pub max_splitting_count: u32,
    /// Cube-to-sphere warp.
    pub projection: ProjectionMethod,
}

/// Tile streaming and atlas configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TileConfig {
    /// Atlas cells per side.
    pub atlas_tiles_per_side: u32,
    /// Edge length of one tile image in pixels.
    pub tile_pixel_size: u32,
    /// Zoom before the first viewport-driven range.
    pub initial_zoom: u8,
    /// Levels beyond the current zoom tried on each range update.
    pub zoom_lookahead: u8,
    /// Coarsest zoom the range computation backs off to.
    pub min_zoom: u8,
    /// Zoom of the full-globe range used while the viewport is undefined.
    pub fallback_zoom: u8,
    /// Coarsest ancestor the resolver climbs to before using a placeholder.
    pub resolve_floor_zoom: u8,
    /// Finest zoom ever requested.
    pub max_zoom: u8,
}

/// Globe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    /// Globe radius in world units.
    pub radius: f64,
}

/// Demo camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Width over height.
    pub aspect_ratio: f64,
    /// Distance from the globe center at startup.
    pub start_distance: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to a file in release builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            target_vertices: 40_000,
            max_splitting_count: 10,
            projection: ProjectionMethod::Everitt,
        }
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            atlas_tiles_per_side: 32,
            tile_pixel_size: 256,
            initial_zoom: 2,
            zoom_lookahead: 3,
            min_zoom: 2,
            fallback_zoom: 5,
            resolve_floor_zoom: 0,
            max_zoom: 19,
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self { radius: 100.0 }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            start_distance: 300.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let config = read_config(&config_path)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join("config.ron");
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let new_config = read_config(&config_path)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the mesher or tile resolver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.mesh.resolution < 2 {
            return invalid("mesh.resolution", "a patch needs at least 2 vertices per side");
        }
        if self.mesh.max_splitting_count == 0 {
            return invalid("mesh.max_splitting_count", "must be at least 1");
        }
        if self.tiles.atlas_tiles_per_side < 4 {
            return invalid("tiles.atlas_tiles_per_side", "must be at least 4");
        }
        if self.tiles.min_zoom > self.tiles.max_zoom {
            return invalid("tiles.min_zoom", "must not exceed tiles.max_zoom");
        }
        if !(self.globe.radius.is_finite() && self.globe.radius > 0.0) {
            return invalid("globe.radius", "must be positive");
        }
        if !(self.camera.fov_y_degrees > 0.0 && self.camera.fov_y_degrees < 180.0) {
            return invalid("camera.fov_y_degrees", "must be between 0 and 180");
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(ConfigError::ParseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("target_vertices: 40000"));
        assert!(ron_str.contains("atlas_tiles_per_side: 32"));
        assert!(ron_str.contains("projection: Everitt"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.mesh.projection = ProjectionMethod::TangentWarp;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(mesh: (resolution: 16), globe: (radius: 6371.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.mesh.resolution, 16);
        assert_eq!(config.mesh.target_vertices, 40_000);
        assert_eq!(config.globe.radius, 6371.0);
        assert_eq!(config.tiles, TileConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.tiles.max_zoom = 12;
        config.camera.start_distance = 450.0;
        config.debug.log_level = "trace".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.mesh.target_vertices = 90_000;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.mesh.target_vertices), Some(90_000));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(mesh: (resolution: 0))").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "mesh.resolution",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let mut config = Config::default();
        config.tiles.min_zoom = 10;
        config.tiles.max_zoom = 3;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tiles.min_zoom"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("config.ron"));
    }
}
