//! Source geometry projected to unit Web Mercator space.
//!
//! Raw GeoJSON is converted once, when an index is built. Every tile query
//! afterwards works on these projected features and quantizes the result to
//! tile-local integers.

use crate::coord::{project, tile_unit_bounds, BoundingBox, TileCoord};
use crate::feature::{PropertyValue, TileFeature, TileGeometry, TilePoint};
use geojson::{feature::Id, GeoJson, Geometry, Value};
use std::sync::Arc;

/// A position in unit Web Mercator space.
pub(crate) type UnitPoint = (f64, f64);

/// Geometry in unit Web Mercator space.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UnitGeometry {
    Points(Vec<UnitPoint>),
    Lines(Vec<Vec<UnitPoint>>),
    /// Polygons, each a list of rings with the exterior first.
    Polygons(Vec<Vec<Vec<UnitPoint>>>),
}

/// A source feature after projection.
#[derive(Debug, Clone)]
pub(crate) struct UnitFeature {
    pub id: Option<u64>,
    pub geometry: UnitGeometry,
    pub properties: Arc<Vec<(String, PropertyValue)>>,
    /// `(min_x, min_y, max_x, max_y)` of the geometry.
    pub bounds: (f64, f64, f64, f64),
}

impl UnitFeature {
    pub fn new(
        id: Option<u64>,
        geometry: UnitGeometry,
        properties: Arc<Vec<(String, PropertyValue)>>,
    ) -> Self {
        let bounds = geometry_bounds(&geometry);
        Self {
            id,
            geometry,
            properties,
            bounds,
        }
    }
}

/// Converts parsed GeoJSON into projected features and their geographic extent.
pub(crate) fn collect_features(
    geojson: &GeoJson,
    generate_id: bool,
) -> (Vec<UnitFeature>, Option<BoundingBox>) {
    let mut collector = Collector::default();
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                collector.add_feature(feature, generate_id);
            }
        }
        GeoJson::Feature(feature) => collector.add_feature(feature, generate_id),
        GeoJson::Geometry(geometry) => {
            collector.add_geometry(geometry, None, Arc::new(Vec::new()));
        }
    }
    (collector.features, collector.bbox)
}

/// Converts a GeoJSON property map into tile properties, dropping nulls.
pub(crate) fn convert_properties(
    properties: Option<&serde_json::Map<String, serde_json::Value>>,
) -> Vec<(String, PropertyValue)> {
    properties
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| {
                    PropertyValue::from_json(value).map(|v| (key.clone(), v))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Default)]
struct Collector {
    features: Vec<UnitFeature>,
    bbox: Option<BoundingBox>,
    next_id: u64,
}

impl Collector {
    fn add_feature(&mut self, feature: &geojson::Feature, generate_id: bool) {
        let Some(geometry) = feature.geometry.as_ref() else {
            return;
        };
        let id = match &feature.id {
            Some(Id::Number(n)) => n.as_u64(),
            _ => None,
        };
        let id = match (id, generate_id) {
            (Some(id), _) => Some(id),
            (None, true) => Some(self.next_id),
            (None, false) => None,
        };
        self.next_id += 1;
        let properties = Arc::new(convert_properties(feature.properties.as_ref()));
        self.add_geometry(geometry, id, properties);
    }

    fn add_geometry(
        &mut self,
        geometry: &Geometry,
        id: Option<u64>,
        properties: Arc<Vec<(String, PropertyValue)>>,
    ) {
        let unit = match &geometry.value {
            Value::Point(position) => self.points(std::slice::from_ref(position)),
            Value::MultiPoint(positions) => self.points(positions),
            Value::LineString(line) => UnitGeometry::Lines(vec![self.path(line)]),
            Value::MultiLineString(lines) => {
                UnitGeometry::Lines(lines.iter().map(|line| self.path(line)).collect())
            }
            Value::Polygon(rings) => UnitGeometry::Polygons(vec![self.rings(rings)]),
            Value::MultiPolygon(polygons) => UnitGeometry::Polygons(
                polygons.iter().map(|rings| self.rings(rings)).collect(),
            ),
            Value::GeometryCollection(members) => {
                for member in members {
                    self.add_geometry(member, id, Arc::clone(&properties));
                }
                return;
            }
        };
        if geometry_is_empty(&unit) {
            return;
        }
        self.features.push(UnitFeature::new(id, unit, properties));
    }

    fn points(&mut self, positions: &[Vec<f64>]) -> UnitGeometry {
        UnitGeometry::Points(self.path(positions))
    }

    fn rings(&mut self, rings: &[Vec<Vec<f64>>]) -> Vec<Vec<UnitPoint>> {
        rings.iter().map(|ring| self.path(ring)).collect()
    }

    fn path(&mut self, positions: &[Vec<f64>]) -> Vec<UnitPoint> {
        positions
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| {
                let (lon, lat) = (position[0], position[1]);
                match self.bbox.as_mut() {
                    Some(bbox) => bbox.extend(lon, lat),
                    None => self.bbox = Some(BoundingBox::point(lon, lat)),
                }
                project(lon, lat)
            })
            .collect()
    }
}

fn geometry_is_empty(geometry: &UnitGeometry) -> bool {
    match geometry {
        UnitGeometry::Points(points) => points.is_empty(),
        UnitGeometry::Lines(lines) => lines.iter().all(|line| line.is_empty()),
        UnitGeometry::Polygons(polygons) => polygons
            .iter()
            .all(|rings| rings.first().map_or(true, |ring| ring.is_empty())),
    }
}

fn geometry_bounds(geometry: &UnitGeometry) -> (f64, f64, f64, f64) {
    let mut bounds = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut add = |&(x, y): &UnitPoint| {
        bounds.0 = bounds.0.min(x);
        bounds.1 = bounds.1.min(y);
        bounds.2 = bounds.2.max(x);
        bounds.3 = bounds.3.max(y);
    };
    match geometry {
        UnitGeometry::Points(points) => points.iter().for_each(&mut add),
        UnitGeometry::Lines(lines) => lines.iter().flatten().for_each(&mut add),
        UnitGeometry::Polygons(polygons) => polygons.iter().flatten().flatten().for_each(&mut add),
    }
    bounds
}

/// Maps unit-space features onto a tile's integer grid.
pub(crate) struct Quantizer {
    scale: f64,
    origin_x: f64,
    origin_y: f64,
    extent: f64,
}

impl Quantizer {
    pub fn new(coord: &TileCoord, extent: u32) -> Self {
        let (min_x, min_y, _, _) = tile_unit_bounds(coord);
        Self {
            scale: coord.tiles_per_axis() as f64,
            origin_x: min_x,
            origin_y: min_y,
            extent: f64::from(extent),
        }
    }

    #[inline]
    pub fn point(&self, (x, y): UnitPoint) -> TilePoint {
        TilePoint::new(
            ((x - self.origin_x) * self.scale * self.extent).round() as i32,
            ((y - self.origin_y) * self.scale * self.extent).round() as i32,
        )
    }

    /// Quantizes a feature, returning `None` if nothing of it survives.
    ///
    /// Lines and polygons that collapse below one grid unit are kept as the
    /// smallest shape the grid can express, so a feature visible at a deeper
    /// zoom never vanishes from the tiles above it.
    pub fn feature(&self, feature: &UnitFeature) -> Option<TileFeature> {
        let geometry = match &feature.geometry {
            UnitGeometry::Points(points) => {
                TileGeometry::Points(points.iter().map(|p| self.point(*p)).collect())
            }
            UnitGeometry::Lines(lines) => TileGeometry::Lines(
                lines
                    .iter()
                    .filter(|line| !line.is_empty())
                    .map(|line| {
                        let mut path = self.path(line);
                        if path.len() == 1 {
                            let first = path[0];
                            path.push(TilePoint::new(first.x + 1, first.y));
                        }
                        path
                    })
                    .collect(),
            ),
            UnitGeometry::Polygons(polygons) => {
                let mut rings = Vec::new();
                for polygon in polygons {
                    let Some((exterior, holes)) = polygon.split_first() else {
                        continue;
                    };
                    if exterior.is_empty() {
                        continue;
                    }
                    let mut outer = self.ring(exterior);
                    if outer.len() < 3 {
                        let corner = outer[0];
                        outer = vec![
                            corner,
                            TilePoint::new(corner.x + 1, corner.y),
                            TilePoint::new(corner.x + 1, corner.y + 1),
                            TilePoint::new(corner.x, corner.y + 1),
                        ];
                    }
                    rings.push(rewind(outer, true));
                    for hole in holes {
                        let inner = self.ring(hole);
                        if inner.len() >= 3 {
                            rings.push(rewind(inner, false));
                        }
                    }
                }
                TileGeometry::Polygons(rings)
            }
        };
        if geometry.is_empty() {
            return None;
        }
        Some(TileFeature {
            id: feature.id,
            geometry,
            properties: feature.properties.as_ref().clone(),
        })
    }

    /// Quantizes a path, dropping consecutive duplicates.
    fn path(&self, points: &[UnitPoint]) -> Vec<TilePoint> {
        let mut out: Vec<TilePoint> = Vec::with_capacity(points.len());
        for point in points {
            let q = self.point(*point);
            if out.last() != Some(&q) {
                out.push(q);
            }
        }
        out
    }

    /// Quantizes a ring, leaving it unclosed.
    fn ring(&self, points: &[UnitPoint]) -> Vec<TilePoint> {
        let mut ring = self.path(points);
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        ring
    }
}

/// Twice the signed area of a ring in tile space (y pointing down).
pub(crate) fn signed_area(ring: &[TilePoint]) -> i64 {
    let mut sum = 0i64;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    sum
}

/// Orients a ring: exterior rings get positive area, holes negative.
fn rewind(mut ring: Vec<TilePoint>, exterior: bool) -> Vec<TilePoint> {
    let area = signed_area(&ring);
    if (exterior && area < 0) || (!exterior && area > 0) {
        ring.reverse();
    }
    ring
}
