//! Best-available tile lookup.
//!
//! When the exact tile is missing the pyramid is climbed until a cached
//! ancestor turns up. The ancestor is returned together with the part of it
//! that covers the requested tile, so the compositor can upscale that part as
//! a stand-in.

use std::sync::Arc;

use crate::{TileCache, TileCoord};

/// The square of a coarser tile that covers a finer one.
///
/// The tile is cut into `side_split_count × side_split_count` cells; `x` and
/// `y` index the cell, with `y` counted from the top like tile rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubRegion {
    pub side_split_count: u32,
    pub x: u32,
    pub y: u32,
}

impl SubRegion {
    /// The whole tile.
    pub const FULL: SubRegion = SubRegion {
        side_split_count: 1,
        x: 0,
        y: 0,
    };

    /// Cell of a tile `levels` above `coord` that covers `coord`.
    #[must_use]
    pub fn for_levels(coord: TileCoord, levels: u8) -> Self {
        let side_split_count = 1u32 << levels;
        Self {
            side_split_count,
            x: coord.x % side_split_count,
            y: coord.y % side_split_count,
        }
    }

    /// Number of pyramid levels between the tiles.
    #[must_use]
    pub fn levels(&self) -> u32 {
        self.side_split_count.trailing_zeros()
    }

    /// Texture-space rectangle `[u_min, v_min, u_max, v_max]` with `v` growing
    /// upwards.
    #[must_use]
    pub fn uv_rect(&self) -> [f64; 4] {
        let size = 1.0 / f64::from(self.side_split_count);
        let flipped_y = self.side_split_count - 1 - self.y;
        let u = f64::from(self.x) * size;
        let v = f64::from(flipped_y) * size;
        [u, v, u + size, v + size]
    }
}

/// A cached tile standing in for a requested one.
#[derive(Debug)]
pub struct ResolvedTile<I> {
    /// The tile that was found.
    pub coord: TileCoord,
    pub image: Arc<I>,
    pub sub_region: SubRegion,
}

impl<I> Clone for ResolvedTile<I> {
    fn clone(&self) -> Self {
        Self {
            coord: self.coord,
            image: Arc::clone(&self.image),
            sub_region: self.sub_region,
        }
    }
}

impl<I> ResolvedTile<I> {
    /// Levels climbed to find the tile.
    #[must_use]
    pub fn precision_difference(&self) -> u32 {
        self.sub_region.levels()
    }

    /// The exact tile was cached.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.sub_region.side_split_count == 1
    }
}

/// Find `coord` or its nearest cached ancestor no coarser than `floor_zoom`.
///
/// `None` means nothing usable is cached and a placeholder should be drawn.
#[must_use]
pub fn resolve_tile<I>(cache: &TileCache<I>, coord: TileCoord, floor_zoom: u8) -> Option<ResolvedTile<I>> {
    let mut levels = 0u8;
    let mut current = coord;
    loop {
        if let Some(image) = cache.get(&current) {
            return Some(ResolvedTile {
                coord: current,
                image: Arc::clone(image),
                sub_region: SubRegion::for_levels(coord, levels),
            });
        }
        if current.zoom <= floor_zoom {
            return None;
        }
        current = current.parent()?;
        levels += 1;
    }
}
