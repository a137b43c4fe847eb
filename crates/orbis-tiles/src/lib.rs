//! Web-Mercator tile pyramid: which tiles the viewport needs, what is cached,
//! the best stand-in for a missing tile, and how tiles are laid out in the
//! globe's texture atlas.

mod atlas;
mod cache;
mod coord;
mod error;
mod fetch;
mod range;
mod resolve;

pub use atlas::{AtlasLayout, MaterialParams, StitchEntry, TileSource};
pub use cache::{TileCache, TileState};
pub use coord::{TileCoord, latitude_to_tile_y, longitude_to_tile_x, tiles_per_side};
pub use error::{FetchError, TileKeyError};
pub use fetch::{FetchCompletion, NETWORK_UPDATE_WINDOW, ThreadedFetcher, TileFetcher, affects_view};
pub use range::{RangeSettings, TileRange, TileSpan, compute_tile_range};
pub use resolve::{ResolvedTile, SubRegion, resolve_tile};
