//! Per-coordinate bookkeeping shared by the lazily-tiling indexes.

use crate::coord::TileCoord;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent map of intermediate tile state keyed by coordinate.
///
/// An index stores what it computed for a tile so that children can be
/// derived from the parent instead of the full source. Entries are removed by
/// [`TileCache::release`] once the walker is done with the coordinate, which
/// keeps the live set proportional to the open branches rather than the
/// pyramid.
pub struct TileCache<T> {
    entries: DashMap<TileCoord, Arc<T>>,
}

impl<T> TileCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Entry stored for exactly this coordinate.
    pub fn get(&self, coord: &TileCoord) -> Option<Arc<T>> {
        self.entries.get(coord).map(|entry| Arc::clone(entry.value()))
    }

    /// Closest strict ancestor of `coord` that has an entry.
    pub fn nearest_ancestor(&self, coord: &TileCoord) -> Option<Arc<T>> {
        let mut current = coord.parent();
        while let Some(tile) = current {
            if let Some(found) = self.get(&tile) {
                return Some(found);
            }
            current = tile.parent();
        }
        None
    }

    pub fn insert(&self, coord: TileCoord, value: Arc<T>) {
        self.entries.insert(coord, value);
    }

    /// Removes the entry for `coord`. Returns whether one was present.
    pub fn release(&self, coord: &TileCoord) -> bool {
        self.entries.remove(coord).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TileCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TileCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(zoom: u8, col: u32, row: u32) -> TileCoord {
        TileCoord::new(zoom, col, row).unwrap()
    }

    #[test]
    fn test_insert_get_release() {
        let cache = TileCache::new();
        cache.insert(coord(1, 0, 1), Arc::new(5));
        assert_eq!(cache.get(&coord(1, 0, 1)).as_deref(), Some(&5));
        assert_eq!(cache.len(), 1);
        assert!(cache.release(&coord(1, 0, 1)));
        assert!(!cache.release(&coord(1, 0, 1)), "second release is a no-op");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_nearest_ancestor_skips_missing_levels() {
        let cache = TileCache::new();
        cache.insert(TileCoord::ROOT, Arc::new("root"));
        cache.insert(coord(2, 1, 1), Arc::new("z2"));

        let deep = coord(4, 5, 6);
        assert_eq!(cache.nearest_ancestor(&deep).as_deref(), Some(&"z2"));

        let elsewhere = coord(4, 15, 15);
        assert_eq!(cache.nearest_ancestor(&elsewhere).as_deref(), Some(&"root"));
    }

    #[test]
    fn test_nearest_ancestor_ignores_self() {
        let cache = TileCache::new();
        cache.insert(coord(3, 1, 1), Arc::new(1));
        assert!(cache.nearest_ancestor(&coord(3, 1, 1)).is_none());
    }
}
