//! In-memory sink.

use super::{SinkError, TileSink};
use crate::coord::TileCoord;
use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps every persisted tile in a concurrent map.
///
/// Useful when tiles are shipped somewhere other than a directory, and for
/// inspecting a run in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    tiles: DashMap<TileCoord, Vec<u8>>,
    writes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: &TileCoord) -> Option<Vec<u8>> {
        self.tiles.get(coord).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.tiles.contains_key(coord)
    }

    /// Stored coordinates in ascending order.
    pub fn coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.tiles.iter().map(|entry| *entry.key()).collect();
        coords.sort();
        coords
    }

    /// Distinct coordinates stored.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Total number of persist calls, including repeats.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TileSink for MemorySink {
    fn persist(&self, coord: TileCoord, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), SinkError>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.tiles.insert(coord, bytes);
        Box::pin(async { Ok(()) })
    }
}
