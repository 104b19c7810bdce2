//! Lazily tiled index over raw GeoJSON.

use super::cache::TileCache;
use super::clip::{clip_features, ClipRect};
use super::options::IndexOptions;
use super::source::{collect_features, Quantizer, UnitFeature};
use super::{IndexShape, LayerIndex};
use crate::coord::{tile_unit_bounds, BoundingBox, TileCoord};
use crate::feature::FeatureSet;
use geojson::GeoJson;
use std::sync::Arc;

/// Slices a GeoJSON layer into tiles on demand.
///
/// Each answered tile keeps its clipped features in a [`TileCache`] so its
/// children clip from the parent's subset rather than the whole source.
/// Coordinates are released by the walker once their subtree is done.
pub struct VectorIndex {
    source: Arc<Vec<UnitFeature>>,
    bbox: Option<BoundingBox>,
    options: IndexOptions,
    cache: TileCache<Vec<UnitFeature>>,
}

impl VectorIndex {
    /// Builds an index from parsed GeoJSON.
    pub fn from_geojson(geojson: &GeoJson, options: &IndexOptions) -> Self {
        let (features, bbox) = collect_features(geojson, options.generate_id);
        tracing::debug!(
            features = features.len(),
            extent = options.extent,
            buffer = options.buffer,
            "Built vector index"
        );
        Self {
            source: Arc::new(features),
            bbox,
            options: options.clone(),
            cache: TileCache::new(),
        }
    }

    /// Number of source features after projection.
    pub fn feature_count(&self) -> usize {
        self.source.len()
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    fn clip_rect(&self, coord: &TileCoord) -> ClipRect {
        let (min_x, min_y, max_x, max_y) = tile_unit_bounds(coord);
        let margin = f64::from(self.options.buffer)
            / f64::from(self.options.extent)
            / coord.tiles_per_axis() as f64;
        ClipRect {
            min_x: min_x - margin,
            min_y: min_y - margin,
            max_x: max_x + margin,
            max_y: max_y + margin,
        }
    }
}

impl LayerIndex for VectorIndex {
    fn tile(&self, coord: TileCoord) -> Option<FeatureSet> {
        if self.source.is_empty() {
            return None;
        }
        let clipped = match self.cache.get(&coord) {
            Some(hit) => hit,
            None => {
                let parent = self
                    .cache
                    .nearest_ancestor(&coord)
                    .unwrap_or_else(|| Arc::clone(&self.source));
                let clipped = clip_features(&parent, &self.clip_rect(&coord));
                if clipped.is_empty() {
                    return None;
                }
                let clipped = Arc::new(clipped);
                self.cache.insert(coord, Arc::clone(&clipped));
                clipped
            }
        };

        let quantizer = Quantizer::new(&coord, self.options.extent);
        let features: Vec<_> = clipped
            .iter()
            .filter_map(|feature| quantizer.feature(feature))
            .collect();
        if features.is_empty() {
            return None;
        }
        Some(FeatureSet::new(self.options.extent, features))
    }

    fn shape(&self) -> IndexShape {
        IndexShape::Points(self.bbox)
    }

    fn release(&self, coord: TileCoord) {
        self.cache.release(&coord);
    }

    fn retained(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("features", &self.source.len())
            .field("bbox", &self.bbox)
            .field("options", &self.options)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::TileGeometry;
    use serde_json::json;

    fn index(value: serde_json::Value) -> VectorIndex {
        let geojson = GeoJson::from_json_value(value).unwrap();
        VectorIndex::from_geojson(&geojson, &IndexOptions::default())
    }

    fn point_collection(points: &[(f64, f64)]) -> serde_json::Value {
        let features: Vec<_> = points
            .iter()
            .map(|(lon, lat)| {
                json!({
                    "type": "Feature",
                    "properties": {"name": "p"},
                    "geometry": {"type": "Point", "coordinates": [lon, lat]}
                })
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    #[test]
    fn test_root_tile_contains_everything() {
        let idx = index(point_collection(&[(-100.0, 40.0), (100.0, -40.0)]));
        let tile = idx.tile(TileCoord::ROOT).unwrap();
        assert_eq!(tile.len(), 2);
        assert_eq!(tile.extent, 4096);
    }

    #[test]
    fn test_empty_quadrant_returns_none() {
        // Both points in the western hemisphere, northern half
        let idx = index(point_collection(&[(-100.0, 40.0), (-90.0, 30.0)]));
        assert!(idx.tile(TileCoord::ROOT).is_some());
        let east_south = TileCoord::new(1, 1, 1).unwrap();
        assert!(idx.tile(east_south).is_none());
        let west_north = TileCoord::new(1, 0, 0).unwrap();
        assert_eq!(idx.tile(west_north).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_source_has_no_tiles() {
        let idx = index(json!({"type": "FeatureCollection", "features": []}));
        assert!(idx.tile(TileCoord::ROOT).is_none());
        assert_eq!(idx.shape(), IndexShape::Points(None));
    }

    #[test]
    fn test_emptiness_is_monotone_for_lines() {
        let idx = index(json!({
            "type": "Feature", "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[-10.0, 10.0], [10.0, -10.0]]}
        }));
        let mut frontier = vec![TileCoord::ROOT];
        while let Some(coord) = frontier.pop() {
            let present = idx.tile(coord).is_some();
            for child in coord.children() {
                if !present {
                    assert!(idx.tile(child).is_none(), "{} empty but {} not", coord, child);
                } else if child.zoom <= 5 {
                    frontier.push(child);
                }
            }
        }
    }

    #[test]
    fn test_release_drops_cached_state() {
        let idx = index(point_collection(&[(1.0, 1.0)]));
        idx.tile(TileCoord::ROOT).unwrap();
        let child = TileCoord::new(1, 1, 0).unwrap();
        idx.tile(child).unwrap();
        assert_eq!(idx.retained(), 2);
        idx.release(child);
        idx.release(TileCoord::ROOT);
        assert_eq!(idx.retained(), 0);
    }

    #[test]
    fn test_polygon_exterior_is_positive() {
        let idx = index(json!({
            "type": "Feature", "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[
                [-20.0, -20.0], [20.0, -20.0], [20.0, 20.0], [-20.0, 20.0], [-20.0, -20.0]
            ]]}
        }));
        let tile = idx.tile(TileCoord::ROOT).unwrap();
        match &tile.features[0].geometry {
            TileGeometry::Polygons(rings) => {
                assert_eq!(rings.len(), 1);
                assert!(super::super::source::signed_area(&rings[0]) > 0);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_reports_bbox() {
        let idx = index(point_collection(&[(-10.0, 5.0), (20.0, -5.0)]));
        match idx.shape() {
            IndexShape::Points(Some(bbox)) => {
                assert_eq!(bbox.west, -10.0);
                assert_eq!(bbox.east, 20.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
