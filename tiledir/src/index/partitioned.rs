//! Index over tiles that were already cut elsewhere.

use super::{IndexShape, LayerIndex};
use crate::coord::TileCoord;
use crate::feature::FeatureSet;
use dashmap::DashMap;

/// A layer supplied as an explicit set of pre-built tiles.
///
/// The tile set need not be closed under ancestry: a tile may exist while
/// its parent does not. The walker seeds its frontier from
/// [`IndexShape::Tiles`], and an absent tile means an empty subtree.
/// Released tiles are dropped, so each tile is handed out for encoding once
/// per visit.
#[derive(Debug, Default)]
pub struct PartitionedIndex {
    tiles: DashMap<TileCoord, FeatureSet>,
}

impl PartitionedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the features of one tile. Empty sets are ignored.
    pub fn insert(&self, coord: TileCoord, features: FeatureSet) {
        if features.is_empty() {
            return;
        }
        self.tiles.insert(coord, features);
    }

    pub fn with_tile(self, coord: TileCoord, features: FeatureSet) -> Self {
        self.insert(coord, features);
        self
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl FromIterator<(TileCoord, FeatureSet)> for PartitionedIndex {
    fn from_iter<I: IntoIterator<Item = (TileCoord, FeatureSet)>>(iter: I) -> Self {
        let index = Self::new();
        for (coord, features) in iter {
            index.insert(coord, features);
        }
        index
    }
}

impl LayerIndex for PartitionedIndex {
    fn tile(&self, coord: TileCoord) -> Option<FeatureSet> {
        self.tiles.get(&coord).map(|entry| entry.value().clone())
    }

    fn shape(&self) -> IndexShape {
        let mut coords: Vec<TileCoord> = self.tiles.iter().map(|entry| *entry.key()).collect();
        coords.sort();
        IndexShape::Tiles(coords)
    }

    fn release(&self, coord: TileCoord) {
        self.tiles.remove(&coord);
    }

    fn retained(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{TileFeature, TileGeometry, TilePoint};

    fn one_point() -> FeatureSet {
        FeatureSet::new(
            4096,
            vec![TileFeature::new(TileGeometry::Points(vec![TilePoint::new(10, 10)]))],
        )
    }

    #[test]
    fn test_shape_lists_sorted_tiles() {
        let b = TileCoord::new(3, 2, 1).unwrap();
        let a = TileCoord::new(2, 1, 1).unwrap();
        let index: PartitionedIndex = vec![(b, one_point()), (a, one_point())].into_iter().collect();
        assert_eq!(index.shape(), IndexShape::Tiles(vec![a, b]));
    }

    #[test]
    fn test_missing_tile_is_empty() {
        let coord = TileCoord::new(2, 1, 1).unwrap();
        let index = PartitionedIndex::new().with_tile(coord, one_point());
        assert!(index.tile(coord).is_some());
        assert!(index.tile(TileCoord::ROOT).is_none());
    }

    #[test]
    fn test_empty_sets_are_not_stored() {
        let index = PartitionedIndex::new().with_tile(TileCoord::ROOT, FeatureSet::empty(4096));
        assert!(index.is_empty());
    }

    #[test]
    fn test_release_removes_tile() {
        let coord = TileCoord::new(1, 0, 0).unwrap();
        let index = PartitionedIndex::new().with_tile(coord, one_point());
        assert_eq!(index.retained(), 1);
        index.release(coord);
        assert_eq!(index.retained(), 0);
        assert!(index.tile(coord).is_none());
    }
}
