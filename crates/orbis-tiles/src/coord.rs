//! Web-Mercator tile coordinates.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use orbis_geodesy::GeoPoint;

use crate::TileKeyError;

/// Number of tiles along one side of the pyramid level `zoom`.
#[inline]
#[must_use]
pub fn tiles_per_side(zoom: u8) -> u32 {
    1u32 << zoom.min(TileCoord::MAX_ZOOM)
}

/// Column of the tile containing `longitude` (radians), clamped to the level.
#[must_use]
pub fn longitude_to_tile_x(longitude: f64, zoom: u8) -> u32 {
    let side = tiles_per_side(zoom);
    let x = (f64::from(side) * (longitude + PI) / TAU).floor();
    clamp_index(x, side)
}

/// Row of the tile containing `latitude` (radians), counted from the north,
/// clamped to the level.
///
/// Uses `asinh(tan φ)`, which equals `ln(tan φ + sec φ)` but stays finite at
/// the poles.
#[must_use]
pub fn latitude_to_tile_y(latitude: f64, zoom: u8) -> u32 {
    let side = tiles_per_side(zoom);
    let mercator = latitude.tan().asinh();
    let y = (f64::from(side) * (1.0 - mercator / PI) / 2.0).floor();
    clamp_index(y, side)
}

fn clamp_index(value: f64, side: u32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, f64::from(side - 1)) as u32
}

/// A tile in the pyramid. `y` grows southwards from row 0 at the north edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    /// Deepest level representable with `u32` indices and still sensible for
    /// imagery.
    pub const MAX_ZOOM: u8 = 24;

    /// The single tile covering the whole globe.
    pub const ROOT: TileCoord = TileCoord { zoom: 0, x: 0, y: 0 };

    /// Create a coordinate, or `None` if it lies outside its level.
    #[must_use]
    pub fn new(zoom: u8, x: u32, y: u32) -> Option<Self> {
        let coord = Self { zoom, x, y };
        coord.is_valid().then_some(coord)
    }

    /// The tile containing `(longitude, latitude)` in radians.
    #[must_use]
    pub fn from_lon_lat(longitude: f64, latitude: f64, zoom: u8) -> Self {
        let zoom = zoom.min(Self::MAX_ZOOM);
        Self {
            zoom,
            x: longitude_to_tile_x(longitude, zoom),
            y: latitude_to_tile_y(latitude, zoom),
        }
    }

    /// The tile containing a surface point.
    #[must_use]
    pub fn from_geo(point: GeoPoint, zoom: u8) -> Self {
        let (lon, lat) = point.lon_lat();
        Self::from_lon_lat(lon, lat, zoom)
    }

    /// Whether the indices fit the zoom level.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.zoom <= Self::MAX_ZOOM && self.x < tiles_per_side(self.zoom) && self.y < tiles_per_side(self.zoom)
    }

    /// The tile one level up that contains this one.
    #[must_use]
    pub fn parent(&self) -> Option<TileCoord> {
        (self.zoom > 0).then(|| TileCoord {
            zoom: self.zoom - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// The containing tile `levels` up, or `None` past the root.
    #[must_use]
    pub fn ancestor(&self, levels: u8) -> Option<TileCoord> {
        (levels <= self.zoom).then(|| TileCoord {
            zoom: self.zoom - levels,
            x: self.x >> levels,
            y: self.y >> levels,
        })
    }

    /// Longitude and latitude (radians) of the tile's center.
    #[must_use]
    pub fn center_lon_lat(&self) -> (f64, f64) {
        let side = f64::from(tiles_per_side(self.zoom));
        let lon = (f64::from(self.x) + 0.5) / side * TAU - PI;
        let n = PI * (1.0 - 2.0 * (f64::from(self.y) + 0.5) / side);
        (lon, n.sinh().atan())
    }

    /// The tile's center as a surface point.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        let (lon, lat) = self.center_lon_lat();
        GeoPoint::from_lon_lat(lon, lat)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = TileKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = key.split('/').collect();
        let [zoom, x, y] = parts.as_slice() else {
            return Err(TileKeyError::Malformed(key.to_owned()));
        };

        let number = |s: &str| {
            s.parse::<u32>().map_err(|source| TileKeyError::InvalidNumber {
                key: key.to_owned(),
                source,
            })
        };
        let (zoom, x, y) = (number(*zoom)?, number(*x)?, number(*y)?);

        u8::try_from(zoom)
            .ok()
            .and_then(|zoom| TileCoord::new(zoom, x, y))
            .ok_or_else(|| TileKeyError::OutOfRange(key.to_owned()))
    }
}
