//! Tile-to-atlas-cell assignment and the material parameters that tell the
//! globe shader where the atlas sits on the sphere.

use crate::{ResolvedTile, SubRegion, TileCache, TileCoord, TileRange, resolve_tile, tiles_per_side};

/// What to draw into one atlas cell.
#[derive(Debug)]
pub enum TileSource<I> {
    /// A cached tile, possibly a coarser ancestor of the wanted one.
    Tile(ResolvedTile<I>),
    /// Nothing usable is cached.
    Placeholder,
}

impl<I> TileSource<I> {
    /// Sub-rectangle to sample; the whole texture for placeholders.
    #[must_use]
    pub fn sub_region(&self) -> SubRegion {
        match self {
            TileSource::Tile(tile) => tile.sub_region,
            TileSource::Placeholder => SubRegion::FULL,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TileSource::Placeholder)
    }
}

/// One atlas cell to fill.
#[derive(Debug)]
pub struct StitchEntry<I> {
    /// Atlas column, counted from the left.
    pub column: u32,
    /// Atlas row, counted from the top.
    pub row: u32,
    /// The tile this cell should show.
    pub wanted: Option<TileCoord>,
    pub source: TileSource<I>,
}

/// The full compositor work list for one range.
///
/// Cells are stored column-major: `cells[column * tiles_per_side + row]`.
#[derive(Debug)]
pub struct AtlasLayout<I> {
    pub tiles_per_side: u32,
    pub cells: Vec<StitchEntry<I>>,
}

impl<I> AtlasLayout<I> {
    /// Assign every tile of `range` to a cell and resolve it against `cache`.
    ///
    /// The primary x span occupies the leftmost columns and the wrapped span
    /// continues right after it. Cells outside the range, and tiles with no
    /// cached ancestor at or above `floor_zoom`, get a placeholder. Tiles that
    /// do not fit the atlas are dropped.
    #[must_use]
    pub fn plan(range: &TileRange, cache: &TileCache<I>, atlas_side: u32, floor_zoom: u8) -> Self {
        let side = atlas_side as usize;
        let mut cells: Vec<StitchEntry<I>> = (0..side * side)
            .map(|i| StitchEntry {
                column: (i / side) as u32,
                row: (i % side) as u32,
                wanted: None,
                source: TileSource::Placeholder,
            })
            .collect();

        let primary_columns = range.x.count();
        for coord in range.tiles() {
            let column = if range.x.contains(coord.x) {
                coord.x - range.x.min
            } else {
                let Some(wrapped) = range.wrapped_x else {
                    continue;
                };
                coord.x - wrapped.min + primary_columns
            };
            let row = coord.y - range.y.min;
            if column >= atlas_side || row >= atlas_side {
                continue;
            }

            let cell = &mut cells[column as usize * side + row as usize];
            cell.wanted = Some(coord);
            cell.source = match resolve_tile(cache, coord, floor_zoom) {
                Some(tile) => TileSource::Tile(tile),
                None => TileSource::Placeholder,
            };
        }

        Self {
            tiles_per_side: atlas_side,
            cells,
        }
    }

    /// Cell at `(column, row)`.
    #[must_use]
    pub fn cell(&self, column: u32, row: u32) -> Option<&StitchEntry<I>> {
        if column >= self.tiles_per_side || row >= self.tiles_per_side {
            return None;
        }
        self.cells.get((column * self.tiles_per_side + row) as usize)
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.cells.iter().filter(|c| c.source.is_placeholder()).count()
    }

    /// Cells showing exactly the tile they want.
    #[must_use]
    pub fn exact_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(&c.source, TileSource::Tile(t) if t.is_exact()))
            .count()
    }
}

/// Fractions of the globe's texture space covered by the atlas.
///
/// `bottom`/`top` are Mercator rows measured from the south edge; `left`
/// and `right` hold one pair per x span; `offset` is the fraction of the
/// atlas width taken by the primary span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub bottom: f64,
    pub top: f64,
    pub left: [f64; 2],
    pub right: [f64; 2],
    pub offset: f64,
}

impl MaterialParams {
    /// Parameters for an atlas of `atlas_side` cells per side built from
    /// `range`.
    ///
    /// Without a wrapped span the second x pair starts at column 0.
    #[must_use]
    pub fn compute(range: &TileRange, atlas_side: u32) -> Self {
        let total = f64::from(tiles_per_side(range.zoom));
        let n = f64::from(atlas_side);
        let min_y = f64::from(range.y.min);
        let min_x = [
            f64::from(range.x.min),
            f64::from(range.wrapped_x.map_or(0, |s| s.min)),
        ];

        Self {
            bottom: (total - (min_y + n)) / total,
            top: (total - min_y) / total,
            left: min_x.map(|x| x / total),
            right: min_x.map(|x| (x + n) / total),
            offset: f64::from(range.x.count()) / n,
        }
    }
}
