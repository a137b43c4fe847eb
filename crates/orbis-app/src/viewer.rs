//! Per-tick orchestration of geodesy, meshing and tile streaming.
//!
//! Each tick runs strictly in this order:
//!
//! 1. cast the viewport rays ([`ViewportFrame::compute`]),
//! 2. mesh the visible globe (always),
//! 3. fold finished tile fetches into the cache,
//! 4. recompute the tile range and request missing tiles if the view or the
//!    network state changed,
//! 5. re-plan the texture atlas if the range changed or new tiles arrived.

use orbis_config::Config;
use orbis_cubesphere::{AdaptiveMesher, MeshPatch, MesherSettings, total_vertices};
use orbis_geodesy::{GlobeTransform, ViewportCamera, ViewportFrame};
use orbis_tiles::{
    AtlasLayout, MaterialParams, RangeSettings, TileCache, TileCoord, TileFetcher, TileRange, affects_view,
    compute_tile_range,
};
use tracing::{debug, info, trace};

/// Tunables for [`GlobeViewer`], usually derived from [`Config`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerSettings {
    pub mesher: MesherSettings,
    pub range: RangeSettings,
    /// Zoom used before the first range is computed.
    pub initial_zoom: u8,
    /// How many levels finer than the current zoom each update tries.
    pub zoom_lookahead: u8,
    /// Zoom of the whole-globe range used while the view is undefined.
    pub fallback_zoom: u8,
    /// Coarsest ancestor the atlas planner falls back to.
    pub resolve_floor_zoom: u8,
    pub max_zoom: u8,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ViewerSettings {
    /// Settings from the `mesh` and `tiles` config sections.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mesh = &config.mesh;
        let tiles = &config.tiles;
        Self {
            mesher: MesherSettings {
                resolution: mesh.resolution,
                target_vertices: mesh.target_vertices,
                max_splitting_count: mesh.max_splitting_count,
                projection: mesh.projection,
            },
            range: RangeSettings {
                atlas_tiles_per_side: tiles.atlas_tiles_per_side,
                min_zoom: tiles.min_zoom,
            },
            initial_zoom: tiles.initial_zoom.min(tiles.max_zoom),
            zoom_lookahead: tiles.zoom_lookahead,
            fallback_zoom: tiles.fallback_zoom,
            resolve_floor_zoom: tiles.resolve_floor_zoom,
            max_zoom: tiles.max_zoom.min(TileCoord::MAX_ZOOM),
        }
    }
}

/// The values whose change triggers a tile-range update.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ViewSignature {
    center: Option<(f64, f64)>,
    zoom: u8,
    north_pole_visible: bool,
    south_pole_visible: bool,
    bottom_right_defined: bool,
    radius: f64,
}

impl ViewSignature {
    fn of(frame: &ViewportFrame, zoom: u8, globe: &GlobeTransform) -> Self {
        Self {
            center: frame.center.map(|c| c.lon_lat()),
            zoom,
            north_pole_visible: frame.north_pole_visible,
            south_pole_visible: frame.south_pole_visible,
            bottom_right_defined: frame.bottom_right.is_some(),
            radius: globe.radius,
        }
    }
}

/// A re-planned atlas for the compositor.
#[derive(Debug)]
pub struct AtlasUpdate<I> {
    pub layout: AtlasLayout<I>,
    pub material: MaterialParams,
}

/// Everything one tick produced.
#[derive(Debug)]
pub struct TickOutput<I> {
    pub frame: ViewportFrame,
    pub patches: Vec<MeshPatch>,
    /// The tile range was recomputed this tick.
    pub range_updated: bool,
    /// Fetches issued this tick.
    pub requested: usize,
    /// Present when the atlas must be recomposited.
    pub atlas: Option<AtlasUpdate<I>>,
}

/// Drives meshing and tile streaming for one globe.
pub struct GlobeViewer<I, F> {
    settings: ViewerSettings,
    mesher: AdaptiveMesher,
    cache: TileCache<I>,
    fetcher: F,
    zoom: u8,
    range: TileRange,
    composed: Option<TileRange>,
    network_updated: bool,
    previous: Option<ViewSignature>,
    ticks: u64,
}

impl<I, F: TileFetcher<I>> GlobeViewer<I, F> {
    /// Viewer with an empty cache.
    pub fn new(settings: ViewerSettings, fetcher: F) -> Self {
        Self {
            mesher: AdaptiveMesher::new(settings.mesher),
            cache: TileCache::new(),
            fetcher,
            zoom: settings.initial_zoom,
            range: TileRange::full(settings.fallback_zoom),
            composed: None,
            network_updated: false,
            previous: None,
            ticks: 0,
            settings,
        }
    }

    /// Pre-populate the cache, e.g. with bundled low-zoom tiles.
    pub fn seed_tile(&mut self, coord: TileCoord, image: I) {
        self.cache.insert_ready(coord, image);
    }

    /// Swap in new settings; the next tick re-evaluates the range.
    pub fn apply_settings(&mut self, settings: ViewerSettings) {
        self.mesher.set_settings(settings.mesher);
        self.zoom = self.zoom.min(settings.max_zoom);
        self.settings = settings;
        self.previous = None;
    }

    /// Run one tick for the given camera and globe.
    pub fn tick(&mut self, camera: &impl ViewportCamera, globe: &GlobeTransform) -> TickOutput<I> {
        self.ticks += 1;

        let frame = ViewportFrame::compute(camera, globe);
        let patches = self.mesher.generate(&frame);
        trace!(
            tick = self.ticks,
            patches = patches.len(),
            vertices = total_vertices(&patches),
            "globe meshed"
        );

        self.poll_fetches();

        let changed = self.previous != Some(ViewSignature::of(&frame, self.zoom, globe));
        let range_updated = changed || self.network_updated;
        let mut requested = 0;
        if range_updated {
            self.update_range(&frame);
            requested = self.request_range();
        }
        self.previous = Some(ViewSignature::of(&frame, self.zoom, globe));

        let atlas = if self.composed != Some(self.range) || self.network_updated {
            self.composed = Some(self.range);
            self.network_updated = false;
            let layout = AtlasLayout::plan(
                &self.range,
                &self.cache,
                self.settings.range.atlas_tiles_per_side,
                self.settings.resolve_floor_zoom,
            );
            let material = MaterialParams::compute(&self.range, self.settings.range.atlas_tiles_per_side);
            debug!(
                zoom = self.range.zoom,
                placeholders = layout.placeholder_count(),
                exact = layout.exact_count(),
                "atlas re-planned"
            );
            Some(AtlasUpdate { layout, material })
        } else {
            None
        };

        TickOutput {
            frame,
            patches,
            range_updated,
            requested,
            atlas,
        }
    }

    fn poll_fetches(&mut self) {
        for completion in self.fetcher.drain() {
            // Only a tile turning ready can change the picture; failures stay
            // absent until the next range update asks for them again.
            if completion.result.is_ok() && affects_view(completion.coord.zoom, self.zoom) {
                self.network_updated = true;
            }
            self.cache.complete(completion.coord, completion.result);
        }
    }

    fn update_range(&mut self, frame: &ViewportFrame) {
        let target = self
            .zoom
            .saturating_add(self.settings.zoom_lookahead)
            .min(self.settings.max_zoom);

        let range = match compute_tile_range(frame, target, &self.settings.range) {
            Some(range) => range,
            None => TileRange::full(self.settings.fallback_zoom.min(self.settings.max_zoom)),
        };

        if range.zoom != self.zoom {
            info!(from = self.zoom, to = range.zoom, "tile zoom changed");
        }
        self.zoom = range.zoom;
        self.range = range;
    }

    fn request_range(&mut self) -> usize {
        let mut requested = 0;
        let mut deferred = 0;
        for coord in self.range.tiles() {
            if !self.cache.request(coord) {
                continue;
            }
            match self.fetcher.request(coord) {
                Ok(()) => requested += 1,
                Err(err) => {
                    // Not issued; leave it absent so a later update asks again.
                    self.cache.release(coord);
                    deferred += 1;
                    trace!(%coord, error = %err, "tile request deferred");
                }
            }
        }
        if deferred > 0 {
            debug!(requested, deferred, "tile requests deferred");
        }
        requested
    }

    /// Current tile zoom.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The range from the last update.
    pub fn range(&self) -> &TileRange {
        &self.range
    }

    pub fn cache(&self) -> &TileCache<I> {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use glam::DVec3;
    use orbis_geodesy::PerspectiveCamera;
    use orbis_tiles::{FetchCompletion, FetchError};

    use super::*;

    /// Records requests; completions are pushed by the test.
    #[derive(Default)]
    struct ManualFetcher {
        requested: RefCell<Vec<TileCoord>>,
        ready: RefCell<Vec<FetchCompletion<u32>>>,
        reject: Cell<bool>,
    }

    impl TileFetcher<u32> for ManualFetcher {
        fn request(&self, coord: TileCoord) -> Result<(), FetchError> {
            if self.reject.get() {
                return Err(FetchError::QueueFull(coord));
            }
            self.requested.borrow_mut().push(coord);
            Ok(())
        }

        fn drain(&self) -> Vec<FetchCompletion<u32>> {
            std::mem::take(&mut *self.ready.borrow_mut())
        }

        fn in_flight(&self) -> u64 {
            0
        }
    }

    /// Accepts every request and fails it on the next drain.
    #[derive(Default)]
    struct FailingFetcher {
        requested: RefCell<Vec<TileCoord>>,
        outstanding: RefCell<Vec<TileCoord>>,
    }

    impl TileFetcher<u32> for FailingFetcher {
        fn request(&self, coord: TileCoord) -> Result<(), FetchError> {
            self.requested.borrow_mut().push(coord);
            self.outstanding.borrow_mut().push(coord);
            Ok(())
        }

        fn drain(&self) -> Vec<FetchCompletion<u32>> {
            std::mem::take(&mut *self.outstanding.borrow_mut())
                .into_iter()
                .map(|coord| FetchCompletion {
                    coord,
                    result: Err(FetchError::Transport {
                        coord,
                        message: "connection refused".into(),
                    }),
                })
                .collect()
        }

        fn in_flight(&self) -> u64 {
            self.outstanding.borrow().len() as u64
        }
    }

    fn moved_camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at(DVec3::new(150.0, 0.0, -260.0), DVec3::ZERO, 60f64.to_radians(), 16.0 / 9.0)
    }

    fn globe() -> GlobeTransform {
        GlobeTransform::new(DVec3::ZERO, 100.0)
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::looking_at(DVec3::new(0.0, 0.0, -300.0), DVec3::ZERO, 60f64.to_radians(), 16.0 / 9.0)
    }

    fn small_settings() -> ViewerSettings {
        let mut settings = ViewerSettings::default();
        settings.mesher.target_vertices = 2_000;
        settings
    }

    #[test]
    fn test_first_tick_requests_and_plans() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        let out = viewer.tick(&camera(), &globe());

        assert!(!out.patches.is_empty());
        assert!(out.range_updated);
        assert!(out.requested > 0);
        assert_eq!(out.requested, viewer.fetcher().requested.borrow().len());
        assert_eq!(viewer.cache().pending_count(), out.requested);

        let atlas = out.atlas.expect("first tick composes the atlas");
        assert_eq!(atlas.layout.cells.len(), 32 * 32);
        assert_eq!(atlas.material, MaterialParams::compute(viewer.range(), 32));
    }

    #[test]
    fn test_unchanged_view_skips_range_and_atlas() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        viewer.tick(&camera(), &globe());
        // The zoom may settle on the second tick; after that nothing changes.
        viewer.tick(&camera(), &globe());
        let out = viewer.tick(&camera(), &globe());

        assert!(!out.range_updated);
        assert!(out.atlas.is_none());
        assert_eq!(out.requested, 0);
        assert!(!out.patches.is_empty(), "meshing runs every tick");
    }

    #[test]
    fn test_no_tile_is_requested_twice() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        for _ in 0..5 {
            viewer.tick(&camera(), &globe());
        }
        let requested = viewer.fetcher().requested.borrow();
        let mut unique = requested.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), requested.len());
    }

    #[test]
    fn test_completion_in_window_recomposes() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        viewer.tick(&camera(), &globe());
        viewer.tick(&camera(), &globe());
        viewer.tick(&camera(), &globe());

        let coord = viewer.fetcher().requested.borrow()[0];
        viewer.fetcher().ready.borrow_mut().push(FetchCompletion { coord, result: Ok(9) });
        let out = viewer.tick(&camera(), &globe());

        assert!(viewer.cache().contains_ready(&coord));
        let atlas = out.atlas.expect("a fresh tile at the current zoom recomposes");
        assert!(atlas.layout.exact_count() >= 1);
    }

    #[test]
    fn test_completion_outside_window_is_cached_silently() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        for _ in 0..3 {
            viewer.tick(&camera(), &globe());
        }
        let zoom = viewer.zoom();
        assert!(zoom >= 4, "expected a zoom of at least 4, got {zoom}");

        let coarse = TileCoord { zoom: zoom - 4, x: 0, y: 0 };
        viewer.fetcher().ready.borrow_mut().push(FetchCompletion {
            coord: coarse,
            result: Ok(1),
        });
        let out = viewer.tick(&camera(), &globe());
        assert!(viewer.cache().contains_ready(&coarse));
        assert!(out.atlas.is_none());
    }

    #[test]
    fn test_moving_camera_updates_range() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        viewer.tick(&camera(), &globe());
        viewer.tick(&camera(), &globe());

        let out = viewer.tick(&moved_camera(), &globe());
        assert!(out.range_updated);
    }

    #[test]
    fn test_undefined_view_falls_back_to_full_range() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        let away = PerspectiveCamera::looking_at(DVec3::new(0.0, 0.0, -300.0), DVec3::new(0.0, 0.0, -600.0), 1.0, 1.0);
        let out = viewer.tick(&away, &globe());
        assert!(out.frame.center.is_none());
        assert_eq!(*viewer.range(), TileRange::full(5));
        assert_eq!(viewer.zoom(), 5);
    }

    #[test]
    fn test_rejected_requests_are_retried_later() {
        let fetcher = ManualFetcher {
            reject: Cell::new(true),
            ..ManualFetcher::default()
        };
        let mut viewer = GlobeViewer::new(small_settings(), fetcher);
        let out = viewer.tick(&camera(), &globe());
        assert_eq!(out.requested, 0);
        assert_eq!(viewer.cache().pending_count(), 0);
        assert!(viewer.cache().is_empty());

        viewer.fetcher().reject.set(false);
        let out = viewer.tick(&moved_camera(), &globe());
        assert!(out.range_updated);
        assert_eq!(out.requested as u64, viewer.range().tile_count());
        let first = viewer.range().tiles().next().unwrap();
        assert!(viewer.fetcher().requested.borrow().contains(&first));
        assert!(viewer.cache().state(&first).unwrap().is_pending());
    }

    #[test]
    fn test_failed_fetches_do_not_trigger_refetch() {
        let mut viewer = GlobeViewer::new(small_settings(), FailingFetcher::default());
        let first = viewer.tick(&camera(), &globe());
        let issued = first.requested;
        assert!(issued > 0);

        for _ in 0..20 {
            let out = viewer.tick(&camera(), &globe());
            assert!(!out.range_updated, "a failed tile must not recompute the range");
            assert!(out.atlas.is_none(), "a failed tile must not recompose the atlas");
            assert_eq!(out.requested, 0);
        }
        assert_eq!(viewer.fetcher().requested.borrow().len(), issued);
        assert_eq!(viewer.cache().failed_count(), issued);

        // Moving the camera is the next range update; failed tiles are asked for again.
        let out = viewer.tick(&moved_camera(), &globe());
        assert_eq!(out.requested, issued);
    }

    #[test]
    fn test_seeded_tiles_fill_the_atlas() {
        let mut viewer = GlobeViewer::new(small_settings(), ManualFetcher::default());
        viewer.seed_tile(TileCoord::ROOT, 0);
        let out = viewer.tick(&camera(), &globe());
        let atlas = out.atlas.unwrap();
        let wanted = atlas.layout.cells.iter().filter(|c| c.wanted.is_some()).count();
        assert!(wanted > 0);
        assert_eq!(atlas.layout.placeholder_count(), 32 * 32 - wanted);
    }
}
