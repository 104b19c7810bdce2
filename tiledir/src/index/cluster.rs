//! Grid clustering for point layers.

use super::cache::TileCache;
use super::clip::ClipRect;
use super::options::ClusterOptions;
use super::source::{convert_properties, Quantizer, UnitPoint};
use super::{IndexShape, LayerIndex};
use crate::coord::{project, tile_unit_bounds, BoundingBox, TileCoord};
use crate::feature::{FeatureSet, PropertyValue, TileFeature, TileGeometry};
use geojson::{feature::Id, GeoJson, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A source point for a [`ClusterIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPoint {
    pub lon: f64,
    pub lat: f64,
    pub id: Option<u64>,
    pub properties: Vec<(String, PropertyValue)>,
}

impl ClusterPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            id: None,
            properties: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push((key.into(), value));
        self
    }
}

struct Entry {
    position: UnitPoint,
    id: Option<u64>,
    properties: Arc<Vec<(String, PropertyValue)>>,
}

/// Point index that merges nearby points into cluster features.
///
/// Up to [`ClusterOptions::max_zoom`], points sharing a grid cell of
/// `radius` extent units form one feature carrying `cluster`,
/// `point_count` and `point_count_abbreviated`. Deeper tiles carry the
/// individual points. A tile is empty exactly when none of the source
/// points fall inside its buffered bounds, so emptiness is inherited by
/// every descendant.
pub struct ClusterIndex {
    entries: Vec<Entry>,
    bbox: Option<BoundingBox>,
    options: ClusterOptions,
    cache: TileCache<Vec<u32>>,
}

impl ClusterIndex {
    pub fn new(points: Vec<ClusterPoint>, options: ClusterOptions) -> Self {
        let bbox = BoundingBox::from_points(points.iter().map(|p| (p.lon, p.lat)));
        let entries: Vec<Entry> = points
            .into_iter()
            .map(|point| Entry {
                position: project(point.lon, point.lat),
                id: point.id,
                properties: Arc::new(point.properties),
            })
            .collect();
        tracing::debug!(
            points = entries.len(),
            radius = options.radius,
            max_zoom = options.max_zoom,
            "Built cluster index"
        );
        Self {
            entries,
            bbox,
            options,
            cache: TileCache::new(),
        }
    }

    /// Collects the `Point` and `MultiPoint` features of a GeoJSON document.
    ///
    /// Other geometry kinds are ignored.
    pub fn from_geojson(geojson: &GeoJson, options: ClusterOptions) -> Self {
        let mut points = Vec::new();
        let mut push = |value: &Value, id: Option<u64>, properties: &Vec<(String, PropertyValue)>| {
            let positions: Vec<&Vec<f64>> = match value {
                Value::Point(position) => vec![position],
                Value::MultiPoint(positions) => positions.iter().collect(),
                _ => Vec::new(),
            };
            for position in positions.into_iter().filter(|p| p.len() >= 2) {
                let mut point = ClusterPoint::new(position[0], position[1]);
                point.id = id;
                point.properties = properties.clone();
                points.push(point);
            }
        };
        match geojson {
            GeoJson::FeatureCollection(collection) => {
                for feature in &collection.features {
                    let Some(geometry) = feature.geometry.as_ref() else {
                        continue;
                    };
                    let id = match &feature.id {
                        Some(Id::Number(n)) => n.as_u64(),
                        _ => None,
                    };
                    let properties = convert_properties(feature.properties.as_ref());
                    push(&geometry.value, id, &properties);
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry.as_ref() {
                    let properties = convert_properties(feature.properties.as_ref());
                    push(&geometry.value, None, &properties);
                }
            }
            GeoJson::Geometry(geometry) => push(&geometry.value, None, &Vec::new()),
        }
        Self::new(points, options)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    fn clip_rect(&self, coord: &TileCoord) -> ClipRect {
        let (min_x, min_y, max_x, max_y) = tile_unit_bounds(coord);
        let margin = self.options.radius / f64::from(self.options.extent) / coord.tiles_per_axis() as f64;
        ClipRect {
            min_x: min_x - margin,
            min_y: min_y - margin,
            max_x: max_x + margin,
            max_y: max_y + margin,
        }
    }

    fn point_feature(&self, quantizer: &Quantizer, entry: &Entry) -> TileFeature {
        TileFeature {
            id: entry.id,
            geometry: TileGeometry::Points(vec![quantizer.point(entry.position)]),
            properties: entry.properties.as_ref().clone(),
        }
    }

    fn cluster_features(&self, coord: &TileCoord, members: &[u32]) -> Vec<TileFeature> {
        let quantizer = Quantizer::new(coord, self.options.extent);
        if coord.zoom > self.options.max_zoom {
            return members
                .iter()
                .map(|&i| self.point_feature(&quantizer, &self.entries[i as usize]))
                .collect();
        }

        let cell = (self.options.radius / f64::from(self.options.extent)
            / coord.tiles_per_axis() as f64)
            .max(f64::MIN_POSITIVE);
        let mut cells: BTreeMap<(i64, i64), Vec<u32>> = BTreeMap::new();
        for &i in members {
            let (x, y) = self.entries[i as usize].position;
            let key = ((x / cell).floor() as i64, (y / cell).floor() as i64);
            cells.entry(key).or_default().push(i);
        }

        let mut features = Vec::with_capacity(cells.len());
        for group in cells.values() {
            if group.len() < self.options.min_points {
                features.extend(
                    group
                        .iter()
                        .map(|&i| self.point_feature(&quantizer, &self.entries[i as usize])),
                );
                continue;
            }
            let count = group.len();
            let (sum_x, sum_y) = group.iter().fold((0.0, 0.0), |(sx, sy), &i| {
                let (x, y) = self.entries[i as usize].position;
                (sx + x, sy + y)
            });
            let centroid = (sum_x / count as f64, sum_y / count as f64);
            features.push(
                TileFeature::new(TileGeometry::Points(vec![quantizer.point(centroid)]))
                    .with_property("cluster", PropertyValue::Bool(true))
                    .with_property("point_count", PropertyValue::UInt(count as u64))
                    .with_property("point_count_abbreviated", abbreviate(count)),
            );
        }
        features
    }
}

/// Short form of a cluster size: `1.5k` above a thousand, `12k` above ten thousand.
pub(crate) fn abbreviate(count: usize) -> PropertyValue {
    if count >= 10_000 {
        PropertyValue::String(format!("{}k", (count as f64 / 1000.0).round()))
    } else if count >= 1000 {
        PropertyValue::String(format!("{}k", (count as f64 / 100.0).round() / 10.0))
    } else {
        PropertyValue::UInt(count as u64)
    }
}

impl LayerIndex for ClusterIndex {
    fn tile(&self, coord: TileCoord) -> Option<FeatureSet> {
        if self.entries.is_empty() {
            return None;
        }
        let members = match self.cache.get(&coord) {
            Some(hit) => hit,
            None => {
                let rect = self.clip_rect(&coord);
                let inside = |i: &u32| rect.contains(self.entries[*i as usize].position);
                let members: Vec<u32> = match self.cache.nearest_ancestor(&coord) {
                    Some(parent) => parent.iter().copied().filter(inside).collect(),
                    None => (0..self.entries.len() as u32).filter(inside).collect(),
                };
                if members.is_empty() {
                    return None;
                }
                let members = Arc::new(members);
                self.cache.insert(coord, Arc::clone(&members));
                members
            }
        };
        Some(FeatureSet::new(
            self.options.extent,
            self.cluster_features(&coord, &members),
        ))
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

impl std::fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("points", &self.entries.len())
            .field("bbox", &self.bbox)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property<'a>(feature: &'a TileFeature, key: &str) -> Option<&'a PropertyValue> {
        feature
            .properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[test]
    fn test_nearby_points_cluster_at_low_zoom() {
        let points = vec![
            ClusterPoint::new(10.0, 10.0),
            ClusterPoint::new(10.0001, 10.0001),
            ClusterPoint::new(10.0002, 10.0),
        ];
        let index = ClusterIndex::new(points, ClusterOptions::default());
        let tile = index.tile(TileCoord::ROOT).unwrap();
        assert_eq!(tile.len(), 1);
        let cluster = &tile.features[0];
        assert_eq!(property(cluster, "cluster"), Some(&PropertyValue::Bool(true)));
        assert_eq!(property(cluster, "point_count"), Some(&PropertyValue::UInt(3)));
        assert_eq!(tile.extent, 512);
    }

    #[test]
    fn test_points_split_beyond_max_zoom() {
        let points = vec![
            ClusterPoint::new(10.0, 10.0).with_id(1),
            ClusterPoint::new(10.0001, 10.0001).with_id(2),
        ];
        let options = ClusterOptions::default().with_max_zoom(3);
        let index = ClusterIndex::new(points, options);
        let deep = crate::coord::lon_lat_to_tile(10.0, 10.0, 4).unwrap();
        let tile = index.tile(deep).unwrap();
        assert_eq!(tile.len(), 2);
        assert!(tile.features.iter().all(|f| property(f, "cluster").is_none()));
    }

    #[test]
    fn test_distant_points_do_not_cluster() {
        let points = vec![ClusterPoint::new(-120.0, 40.0), ClusterPoint::new(120.0, -40.0)];
        let index = ClusterIndex::new(points, ClusterOptions::default());
        let tile = index.tile(TileCoord::ROOT).unwrap();
        assert_eq!(tile.len(), 2);
    }

    #[test]
    fn test_empty_tile_and_release() {
        let index = ClusterIndex::new(vec![ClusterPoint::new(-120.0, 40.0)], ClusterOptions::default());
        assert!(index.tile(TileCoord::ROOT).is_some());
        assert!(index.tile(TileCoord::new(1, 1, 1).unwrap()).is_none());
        assert_eq!(index.retained(), 1);
        index.release(TileCoord::ROOT);
        assert_eq!(index.retained(), 0);
    }

    #[test]
    fn test_from_geojson_keeps_points_only() {
        let geojson = GeoJson::from_json_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 5, "properties": {"kind": "a"},
                 "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "MultiPoint", "coordinates": [[3.0, 4.0], [5.0, 6.0]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}}
            ]
        }))
        .unwrap();
        let index = ClusterIndex::from_geojson(&geojson, ClusterOptions::default());
        assert_eq!(index.len(), 3);
        match index.shape() {
            IndexShape::Points(Some(bbox)) => {
                assert_eq!(bbox.west, 1.0);
                assert_eq!(bbox.north, 6.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(abbreviate(999), PropertyValue::UInt(999));
        assert_eq!(abbreviate(1500), PropertyValue::String("1.5k".to_string()));
        assert_eq!(abbreviate(2000), PropertyValue::String("2k".to_string()));
        assert_eq!(abbreviate(12_345), PropertyValue::String("12k".to_string()));
    }
}
