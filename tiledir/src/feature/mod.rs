//! Per-tile feature sets.
//!
//! A [`FeatureSet`] is what a layer index hands back for one tile: features
//! whose geometry has already been clipped and quantized to tile-local
//! integer coordinates in `[0, extent)` (plus buffer). The encoder turns a
//! [`LayerTiles`] mapping of these into one vector tile.

mod property;

pub use property::PropertyValue;

use std::collections::BTreeMap;

/// Default tile extent, matching the common vector tile convention.
pub const DEFAULT_EXTENT: u32 = 4096;

/// A position in tile-local integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Tile-local geometry of one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum TileGeometry {
    /// One or more points.
    Points(Vec<TilePoint>),
    /// One or more line strings.
    Lines(Vec<Vec<TilePoint>>),
    /// Polygon rings, unclosed; each exterior ring is followed by its holes.
    Polygons(Vec<Vec<TilePoint>>),
}

impl TileGeometry {
    /// Whether the geometry carries no coordinates at all.
    pub fn is_empty(&self) -> bool {
        match self {
            TileGeometry::Points(points) => points.is_empty(),
            TileGeometry::Lines(parts) | TileGeometry::Polygons(parts) => {
                parts.iter().all(|part| part.is_empty())
            }
        }
    }
}

/// One feature inside a tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    pub id: Option<u64>,
    pub geometry: TileGeometry,
    pub properties: Vec<(String, PropertyValue)>,
}

impl TileFeature {
    pub fn new(geometry: TileGeometry) -> Self {
        Self {
            id: None,
            geometry,
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

/// The features of one layer visible in one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// Size of the tile's coordinate space along each axis.
    pub extent: u32,
    pub features: Vec<TileFeature>,
}

impl FeatureSet {
    pub fn new(extent: u32, features: Vec<TileFeature>) -> Self {
        Self { extent, features }
    }

    pub fn empty(extent: u32) -> Self {
        Self::new(extent, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

/// Non-empty feature sets of one tile, keyed by layer name.
pub type LayerTiles = BTreeMap<String, FeatureSet>;
