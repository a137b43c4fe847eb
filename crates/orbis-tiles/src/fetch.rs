//! Asynchronous tile fetching.
//!
//! The viewer never blocks on tile I/O. It queues coordinates with a
//! [`TileFetcher`] and drains whatever has completed once per tick. How a
//! tile is actually obtained (HTTP, disk, generated) is up to the loader
//! closure handed to [`ThreadedFetcher`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::debug;

use crate::{FetchError, TileCoord};

/// Completions for zooms more than this many levels coarser than the current
/// one cannot improve the picture and do not trigger a recomposite.
pub const NETWORK_UPDATE_WINDOW: u8 = 4;

/// Whether a tile finished at `completed_zoom` can change what is drawn at
/// `current_zoom`, i.e. `completed_zoom ∈ (current_zoom - 4, current_zoom]`.
#[must_use]
pub fn affects_view(completed_zoom: u8, current_zoom: u8) -> bool {
    completed_zoom <= current_zoom && completed_zoom.saturating_add(NETWORK_UPDATE_WINDOW) > current_zoom
}

/// The outcome of one fetch.
#[derive(Debug)]
pub struct FetchCompletion<I> {
    pub coord: TileCoord,
    pub result: Result<I, FetchError>,
}

/// Something that can fetch tiles in the background.
pub trait TileFetcher<I> {
    /// Queue `coord`. An error means nothing was queued.
    fn request(&self, coord: TileCoord) -> Result<(), FetchError>;

    /// Every completion that has arrived since the last call.
    fn drain(&self) -> Vec<FetchCompletion<I>>;

    /// Requests queued or running.
    fn in_flight(&self) -> u64;
}

/// Runs a loader on a pool of worker threads.
pub struct ThreadedFetcher<I> {
    request_sender: Sender<TileCoord>,
    completion_receiver: Receiver<FetchCompletion<I>>,
    in_flight: Arc<AtomicU64>,
}

impl<I: Send + 'static> ThreadedFetcher<I> {
    /// Spawn `thread_count` workers that call `loader` for each requested
    /// tile. At most `queue_capacity` requests wait at once.
    pub fn spawn<F>(thread_count: usize, queue_capacity: usize, loader: F) -> std::io::Result<Self>
    where
        F: Fn(TileCoord) -> Result<I, FetchError> + Send + Sync + 'static,
    {
        let capacity = queue_capacity.max(1);
        let (request_sender, request_receiver) = bounded::<TileCoord>(capacity);
        let (completion_sender, completion_receiver) = bounded::<FetchCompletion<I>>(capacity * 2);
        let loader = Arc::new(loader);

        for _ in 0..thread_count.max(1) {
            let receiver = request_receiver.clone();
            let sender = completion_sender.clone();
            let loader = Arc::clone(&loader);

            std::thread::Builder::new()
                .name("tile-fetch-worker".into())
                .spawn(move || {
                    while let Ok(coord) = receiver.recv() {
                        let result = loader(coord);
                        if sender.send(FetchCompletion { coord, result }).is_err() {
                            break;
                        }
                    }
                })?;
        }

        Ok(Self {
            request_sender,
            completion_receiver,
            in_flight: Arc::new(AtomicU64::new(0)),
        })
    }
}

impl<I> TileFetcher<I> for ThreadedFetcher<I> {
    fn request(&self, coord: TileCoord) -> Result<(), FetchError> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.request_sender.try_send(coord).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            match e {
                TrySendError::Full(coord) => FetchError::QueueFull(coord),
                TrySendError::Disconnected(_) => FetchError::Disconnected,
            }
        })?;
        debug!(%coord, "tile fetch queued");
        Ok(())
    }

    fn drain(&self) -> Vec<FetchCompletion<I>> {
        let completions: Vec<_> = self.completion_receiver.try_iter().collect();
        self.in_flight
            .fetch_sub(completions.len() as u64, Ordering::Relaxed);
        completions
    }

    fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }
}
