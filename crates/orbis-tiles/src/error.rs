//! Tile error types.

use std::num::ParseIntError;

use crate::TileCoord;

/// A `"{zoom}/{x}/{y}"` key that could not be turned into a [`TileCoord`].
#[derive(Debug, thiserror::Error)]
pub enum TileKeyError {
    /// The key did not have exactly three `/`-separated parts.
    #[error("tile key {0:?} is not of the form zoom/x/y")]
    Malformed(String),

    /// One of the parts was not an unsigned integer.
    #[error("tile key {key:?} has a non-numeric part: {source}")]
    InvalidNumber {
        key: String,
        #[source]
        source: ParseIntError,
    },

    /// The zoom exceeds [`TileCoord::MAX_ZOOM`] or x/y exceed `2^zoom - 1`.
    #[error("tile key {0:?} is outside the pyramid")]
    OutOfRange(String),
}

/// Why a tile could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The transport (HTTP, disk, ...) reported a failure.
    #[error("fetching tile {coord} failed: {message}")]
    Transport { coord: TileCoord, message: String },

    /// The payload arrived but could not be decoded into an image.
    #[error("decoding tile {coord} failed: {message}")]
    Decode { coord: TileCoord, message: String },

    /// The request queue is full; the tile can be asked for again later.
    #[error("fetch queue is full, tile {0} was not queued")]
    QueueFull(TileCoord),

    /// The fetch workers have shut down.
    #[error("tile fetcher is disconnected")]
    Disconnected,
}
