//! Which tiles cover the viewport, and at what zoom.

use orbis_geodesy::ViewportFrame;
use tracing::debug;

use crate::{TileCoord, latitude_to_tile_y, longitude_to_tile_x, tiles_per_side};

/// An inclusive run of tile indices along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileSpan {
    pub min: u32,
    pub max: u32,
}

impl TileSpan {
    /// Span from `min` to `max` inclusive.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Every index of a level with `side` tiles per side.
    #[must_use]
    pub fn full(side: u32) -> Self {
        Self::new(0, side.saturating_sub(1))
    }

    /// `max - min`, the quantity the atlas budget is checked against.
    #[must_use]
    pub fn extent(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }

    /// Number of indices in the span.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.extent() + 1
    }

    /// Whether `index` lies in the span.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        (self.min..=self.max).contains(&index)
    }

    /// Indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        self.min..=self.max
    }
}

/// The tiles needed to texture the visible globe.
///
/// When the view straddles the antimeridian the x-axis is split in two:
/// `x` runs from the western view edge to the last column and `wrapped_x`
/// continues from column 0 eastwards. The atlas lays them out in that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileRange {
    pub zoom: u8,
    pub x: TileSpan,
    pub wrapped_x: Option<TileSpan>,
    pub y: TileSpan,
}

impl TileRange {
    /// Every tile of `zoom`.
    #[must_use]
    pub fn full(zoom: u8) -> Self {
        let side = tiles_per_side(zoom);
        Self {
            zoom,
            x: TileSpan::full(side),
            wrapped_x: None,
            y: TileSpan::full(side),
        }
    }

    /// The x-axis was split across the antimeridian.
    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        self.wrapped_x.is_some()
    }

    /// Columns across both x spans.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.x.count() + self.wrapped_x.map_or(0, |s| s.count())
    }

    /// Total number of tiles in the range.
    #[must_use]
    pub fn tile_count(&self) -> u64 {
        u64::from(self.columns()) * u64::from(self.y.count())
    }

    /// Every tile, primary span first, column by column.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let zoom = self.zoom;
        let y = self.y;
        self.x
            .iter()
            .chain(self.wrapped_x.into_iter().flat_map(|s| s.iter()))
            .flat_map(move |x| y.iter().map(move |y| TileCoord { zoom, x, y }))
    }
}

/// Limits applied while choosing a tile range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSettings {
    /// Atlas cells per side. A span reaching a quarter of this forces a
    /// coarser zoom.
    pub atlas_tiles_per_side: u32,
    /// Coarsest zoom to fall back to; returned as a full range when even it
    /// exceeds the budget.
    pub min_zoom: u8,
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            atlas_tiles_per_side: 32,
            min_zoom: 2,
        }
    }
}

/// Tile range covering `frame` at `zoom`, or at the finest coarser zoom that
/// fits the atlas budget.
///
/// Returns `None` if any of the six edge samples missed the globe; the caller
/// should then use a full range at a safe coarse zoom.
#[must_use]
pub fn compute_tile_range(frame: &ViewportFrame, zoom: u8, settings: &RangeSettings) -> Option<TileRange> {
    let samples = frame.edge_samples();
    let mut lon_lat = [(0.0, 0.0); 6];
    for (slot, sample) in lon_lat.iter_mut().zip(samples) {
        *slot = sample?.lon_lat();
    }
    let corner_lons: [f64; 4] = std::array::from_fn(|i| lon_lat[i].0);
    let lats: [f64; 6] = std::array::from_fn(|i| lon_lat[i].1);
    let poles = (frame.north_pole_visible, frame.south_pole_visible);

    let budget = settings.atlas_tiles_per_side / 4;
    let mut zoom = zoom.min(TileCoord::MAX_ZOOM);
    loop {
        let range = range_at_zoom(&corner_lons, &lats, poles, zoom);
        let over_budget = range.x.extent() >= budget
            || range.wrapped_x.is_some_and(|s| s.extent() >= budget)
            || range.y.extent() >= budget;

        if !over_budget {
            return Some(range);
        }
        if zoom <= settings.min_zoom {
            debug!(zoom, "tile range over budget at the coarsest zoom, using the full level");
            return Some(TileRange::full(zoom));
        }
        zoom -= 1;
    }
}

fn range_at_zoom(corner_lons: &[f64; 4], lats: &[f64; 6], poles: (bool, bool), zoom: u8) -> TileRange {
    let side = tiles_per_side(zoom);
    let (north_visible, south_visible) = poles;

    let max_lat = lats.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_lat = lats.iter().copied().fold(f64::INFINITY, f64::min);
    let mut y = TileSpan::new(latitude_to_tile_y(max_lat, zoom), latitude_to_tile_y(min_lat, zoom));

    if north_visible || south_visible {
        if north_visible {
            y.min = 0;
        }
        if south_visible {
            y.max = side - 1;
        }
        return TileRange {
            zoom,
            x: TileSpan::full(side),
            wrapped_x: None,
            y,
        };
    }

    let xs = corner_lons.map(|lon| longitude_to_tile_x(lon, zoom));
    let min_x = xs.iter().copied().min().unwrap_or(0);
    let max_x = xs.iter().copied().max().unwrap_or(0);

    if max_x - min_x <= side / 2 {
        return TileRange {
            zoom,
            x: TileSpan::new(min_x, max_x),
            wrapped_x: None,
            y,
        };
    }

    // The box spans more than half the globe: the view straddles the
    // antimeridian, so the eastern corners (negative longitude) continue
    // from column 0.
    let west_edge = corner_lons
        .iter()
        .copied()
        .filter(|lon| *lon >= 0.0)
        .fold(f64::INFINITY, f64::min);
    let east_edge = corner_lons
        .iter()
        .copied()
        .filter(|lon| *lon < 0.0)
        .fold(f64::NEG_INFINITY, f64::max);

    TileRange {
        zoom,
        x: TileSpan::new(longitude_to_tile_x(west_edge, zoom), side - 1),
        wrapped_x: Some(TileSpan::new(0, longitude_to_tile_x(east_edge, zoom))),
        y,
    }
}

#[cfg(test)]
mod tests {
    use orbis_geodesy::GeoPoint;

    use super::*;

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    /// Frame whose west edge is at `west` and east edge at `east` degrees.
    fn frame(west: f64, east: f64, south: f64, north: f64) -> ViewportFrame {
        let p = |lon: f64, lat: f64| Some(GeoPoint::from_lon_lat(deg(lon), deg(lat)));
        let mid_lon = if west <= east { (west + east) / 2.0 } else { 180.0 };
        ViewportFrame {
            top_left: p(west, north),
            top_right: p(east, north),
            bottom_left: p(west, south),
            bottom_right: p(east, south),
            top_center: p(mid_lon, north),
            bottom_center: p(mid_lon, south),
            center: p(mid_lon, (north + south) / 2.0),
            north_pole_visible: false,
            south_pole_visible: false,
        }
    }

    fn generous() -> RangeSettings {
        RangeSettings {
            atlas_tiles_per_side: 1 << 20,
            min_zoom: 0,
        }
    }

    #[test]
    fn test_simple_range() {
        let f = frame(10.0, 20.0, -5.0, 5.0);
        let r = compute_tile_range(&f, 4, &generous()).unwrap();
        assert_eq!(r.zoom, 4);
        assert!(!r.is_wrapped());
        assert_eq!(r.x, TileSpan::new(8, 8));
        assert_eq!(r.y, TileSpan::new(7, 8));
    }

    #[test]
    fn test_antimeridian_wraps() {
        let f = frame(179.0, -179.0, -1.0, 1.0);
        let r = compute_tile_range(&f, 8, &generous()).unwrap();
        assert!(r.is_wrapped(), "range should be split across the antimeridian: {r:?}");
        let side = tiles_per_side(8);
        assert_eq!(r.x.max, side - 1);
        assert_eq!(r.x.min, longitude_to_tile_x(deg(179.0), 8));
        let wrapped = r.wrapped_x.unwrap();
        assert_eq!(wrapped.min, 0);
        assert_eq!(wrapped.max, longitude_to_tile_x(deg(-179.0), 8));
        // Two narrow spans, not one covering the whole row.
        assert!(r.columns() < side / 4);
    }

    #[test]
    fn test_wrapped_tiles_follow_primary_span() {
        let f = frame(179.0, -179.0, -1.0, 1.0);
        let r = compute_tile_range(&f, 6, &generous()).unwrap();
        let xs: Vec<u32> = r.tiles().map(|t| t.x).collect();
        let side = tiles_per_side(6);
        assert_eq!(xs.first().copied(), Some(r.x.min));
        assert!(xs.contains(&(side - 1)));
        assert_eq!(xs.last().copied(), r.wrapped_x.map(|s| s.max));
    }

    #[test]
    fn test_pole_forces_full_row() {
        let mut f = frame(10.0, 20.0, 70.0, 85.0);
        f.north_pole_visible = true;
        let r = compute_tile_range(&f, 5, &generous()).unwrap();
        assert_eq!(r.x, TileSpan::full(tiles_per_side(5)));
        assert!(!r.is_wrapped());
        assert_eq!(r.y.min, 0, "rows should reach the north edge");
        assert_eq!(r.y.max, latitude_to_tile_y(deg(70.0), 5));
    }

    #[test]
    fn test_south_pole_extends_to_last_row() {
        let mut f = frame(10.0, 20.0, -85.0, -70.0);
        f.south_pole_visible = true;
        let r = compute_tile_range(&f, 5, &generous()).unwrap();
        assert_eq!(r.y.max, tiles_per_side(5) - 1);
        assert_eq!(r.y.min, latitude_to_tile_y(deg(-70.0), 5));
    }

    #[test]
    fn test_budget_coarsens_zoom() {
        let f = frame(-40.0, 40.0, -30.0, 30.0);
        let settings = RangeSettings {
            atlas_tiles_per_side: 32,
            min_zoom: 0,
        };
        let r = compute_tile_range(&f, 12, &settings).unwrap();
        assert!(r.zoom < 12);
        assert!(r.x.extent() < 8 && r.y.extent() < 8);
        // One level finer would have broken the budget.
        let finer = range_at_zoom(
            &[deg(-40.0), deg(40.0), deg(-40.0), deg(40.0)],
            &[deg(30.0), deg(30.0), deg(-30.0), deg(-30.0), deg(30.0), deg(-30.0)],
            (false, false),
            r.zoom + 1,
        );
        assert!(finer.x.extent() >= 8 || finer.y.extent() >= 8);
    }

    #[test]
    fn test_min_zoom_returns_full_level() {
        let mut f = frame(10.0, 20.0, 70.0, 85.0);
        f.north_pole_visible = true;
        let settings = RangeSettings {
            atlas_tiles_per_side: 4,
            min_zoom: 2,
        };
        let r = compute_tile_range(&f, 6, &settings).unwrap();
        assert_eq!(r, TileRange::full(2));
    }

    #[test]
    fn test_undefined_sample_is_absent() {
        let mut f = frame(10.0, 20.0, -5.0, 5.0);
        f.bottom_center = None;
        assert!(compute_tile_range(&f, 4, &generous()).is_none());
        assert!(compute_tile_range(&ViewportFrame::unknown(), 4, &generous()).is_none());
    }

    #[test]
    fn test_full_range_tiles() {
        let r = TileRange::full(2);
        assert_eq!(r.tile_count(), 16);
        assert_eq!(r.tiles().count(), 16);
        assert!(r.tiles().all(|t| t.is_valid()));
    }
}
