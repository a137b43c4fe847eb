//! Headless orbis demo.
//!
//! Orbits a camera around a globe textured with synthetic tiles and logs what
//! the mesher and tile streamer do each tick.
//!
//! Run with `cargo run -p orbis-app -- --ticks 600 --zoom 3`.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use glam::DVec3;
use orbis_app::{AppError, GlobeViewer, OrbitCamera, PlatformDirs, ViewerSettings, synthetic_loader, synthetic_tile};
use orbis_config::{CliArgs, Config};
use orbis_cubesphere::total_vertices;
use orbis_geodesy::GlobeTransform;
use orbis_tiles::{ThreadedFetcher, TileCoord, TileFetcher};
use tracing::{error, info};

const TICK_SECONDS: f64 = 1.0 / 60.0;
const FETCH_THREADS: usize = 4;
const FETCH_QUEUE: usize = 256;

fn main() -> ExitCode {
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Logging may not be up yet.
            eprintln!("orbis: {err}");
            error!(error = %err, "viewer stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);
    config.validate()?;

    orbis_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions) || config.debug.log_to_file,
        Some(&config),
    );
    info!(config_dir = %dirs.config_dir.display(), "orbis starting");

    let pixel_size = config.tiles.tile_pixel_size;
    let fetcher = ThreadedFetcher::spawn(FETCH_THREADS, FETCH_QUEUE, synthetic_loader(pixel_size))
        .map_err(AppError::Fetcher)?;
    let mut viewer = GlobeViewer::new(ViewerSettings::from_config(&config), fetcher);
    viewer.seed_tile(TileCoord::ROOT, synthetic_tile(TileCoord::ROOT, pixel_size));

    let globe = GlobeTransform::new(DVec3::ZERO, config.globe.radius);
    let mut orbit = OrbitCamera::new(
        config.camera.start_distance,
        0.0,
        0.3,
        config.camera.fov_y_degrees.to_radians(),
        config.camera.aspect_ratio,
    );
    orbit.min_distance = config.globe.radius * 1.05;
    orbit.approach_speed = -(config.camera.start_distance - orbit.min_distance) / (f64::from(args.ticks.max(1)) * TICK_SECONDS);

    for _ in 0..args.ticks {
        let out = viewer.tick(&orbit.camera(&globe), &globe);
        if let Some(atlas) = &out.atlas {
            info!(
                tick = viewer.ticks(),
                zoom = viewer.zoom(),
                patches = out.patches.len(),
                vertices = total_vertices(&out.patches),
                placeholders = atlas.layout.placeholder_count(),
                in_flight = viewer.fetcher().in_flight(),
                "atlas recomposed"
            );
        }
        orbit.advance(TICK_SECONDS);
        std::thread::sleep(Duration::from_secs_f64(TICK_SECONDS));
    }

    let cache = viewer.cache();
    info!(
        ticks = viewer.ticks(),
        ready = cache.ready_count(),
        pending = cache.pending_count(),
        failed = cache.failed_count(),
        "orbis finished"
    );
    Ok(())
}
