//! Session-long tile cache.
//!
//! Every coordinate moves through `absent → pending → ready | failed`. A
//! failed entry behaves like an absent one: it can be requested again. Nothing
//! is ever evicted.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::{FetchError, TileCoord};

/// What the cache knows about one tile.
#[derive(Debug)]
pub enum TileState<I> {
    /// A fetch has been issued and not yet answered.
    Pending,
    /// The image is available.
    Ready(Arc<I>),
    /// The last fetch failed.
    Failed(FetchError),
}

impl<I> TileState<I> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, TileState::Ready(_))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, TileState::Pending)
    }
}

/// Tile images keyed by coordinate, generic over the image type.
#[derive(Debug)]
pub struct TileCache<I> {
    entries: FxHashMap<TileCoord, TileState<I>>,
}

impl<I> Default for TileCache<I> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<I> TileCache<I> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `coord` as pending if it is absent or failed.
    ///
    /// Returns `true` when the caller should issue a fetch; pending and ready
    /// tiles are never fetched twice.
    pub fn request(&mut self, coord: TileCoord) -> bool {
        match self.entries.get(&coord) {
            Some(TileState::Pending | TileState::Ready(_)) => false,
            Some(TileState::Failed(_)) | None => {
                self.entries.insert(coord, TileState::Pending);
                true
            }
        }
    }

    /// Record the outcome of a fetch.
    ///
    /// Late completions for a tile that is already ready overwrite it.
    pub fn complete(&mut self, coord: TileCoord, result: Result<I, FetchError>) {
        let state = match result {
            Ok(image) => {
                debug!(%coord, "tile ready");
                TileState::Ready(Arc::new(image))
            }
            Err(err) => {
                warn!(%coord, error = %err, "tile fetch failed");
                TileState::Failed(err)
            }
        };
        self.entries.insert(coord, state);
    }

    /// Forget a pending request that was never actually issued, so the next
    /// [`request`](Self::request) for it starts over.
    pub fn release(&mut self, coord: TileCoord) {
        if self.entries.get(&coord).is_some_and(TileState::is_pending) {
            self.entries.remove(&coord);
        }
    }

    /// Store an image that did not come from a fetch, such as a bundled
    /// low-zoom tile.
    pub fn insert_ready(&mut self, coord: TileCoord, image: I) {
        self.entries.insert(coord, TileState::Ready(Arc::new(image)));
    }

    /// The image for `coord`, if ready.
    #[must_use]
    pub fn get(&self, coord: &TileCoord) -> Option<&Arc<I>> {
        match self.entries.get(coord) {
            Some(TileState::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Current state of `coord`; `None` means absent.
    #[must_use]
    pub fn state(&self, coord: &TileCoord) -> Option<&TileState<I>> {
        self.entries.get(coord)
    }

    #[must_use]
    pub fn contains_ready(&self, coord: &TileCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Number of known coordinates in any state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_ready()).count()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_pending()).count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.entries
            .values()
            .filter(|s| matches!(s, TileState::Failed(_)))
            .count()
    }
}
