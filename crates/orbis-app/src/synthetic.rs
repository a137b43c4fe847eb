//! Generated tiles for running without a map server.

use image::{Rgba, RgbaImage};
use orbis_tiles::{FetchError, TileCoord};

/// Solid-color tile whose color encodes the coordinate, so mismatched atlas
/// cells are easy to spot.
#[must_use]
pub fn synthetic_tile(coord: TileCoord, pixel_size: u32) -> RgbaImage {
    RgbaImage::from_pixel(pixel_size.max(1), pixel_size.max(1), tile_color(coord))
}

/// Color for a tile: hue from the position, brightness from the zoom.
#[must_use]
pub fn tile_color(coord: TileCoord) -> Rgba<u8> {
    let mix = (coord.x.wrapping_mul(73_856_093) ^ coord.y.wrapping_mul(19_349_663)) as u8;
    let shade = 64u8.saturating_add(coord.zoom.saturating_mul(8));
    Rgba([mix, shade, mix.wrapping_add(coord.zoom.wrapping_mul(31)), 255])
}

/// Loader for a [`ThreadedFetcher`](orbis_tiles::ThreadedFetcher) that
/// synthesizes every tile.
pub fn synthetic_loader(pixel_size: u32) -> impl Fn(TileCoord) -> Result<RgbaImage, FetchError> + Send + Sync + 'static {
    move |coord| {
        if !coord.is_valid() {
            return Err(FetchError::Transport {
                coord,
                message: "no such tile".to_string(),
            });
        }
        Ok(synthetic_tile(coord, pixel_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_is_solid() {
        let coord = TileCoord { zoom: 4, x: 3, y: 9 };
        let tile = synthetic_tile(coord, 16);
        assert_eq!(tile.dimensions(), (16, 16));
        let first = *tile.get_pixel(0, 0);
        assert!(tile.pixels().all(|p| *p == first));
        assert_eq!(first, tile_color(coord));
    }

    #[test]
    fn test_neighbors_differ() {
        let a = tile_color(TileCoord { zoom: 6, x: 10, y: 10 });
        let b = tile_color(TileCoord { zoom: 6, x: 11, y: 10 });
        assert_ne!(a, b);
    }

    #[test]
    fn test_loader_rejects_invalid_tiles() {
        let load = synthetic_loader(8);
        assert!(load(TileCoord { zoom: 1, x: 1, y: 1 }).is_ok());
        assert!(matches!(
            load(TileCoord { zoom: 1, x: 2, y: 0 }),
            Err(FetchError::Transport { .. })
        ));
    }
}
