//! Vector tile encoding.
//!
//! [`TileEncoder`] is the seam between the pyramid walk and the binary tile
//! format. [`MvtEncoder`] writes Mapbox Vector Tiles with the `mvt` crate.

use crate::feature::{
    FeatureSet, LayerTiles, PropertyValue, TileFeature, TileGeometry, TilePoint, DEFAULT_EXTENT,
};
use mvt::{GeomEncoder, GeomType, Layer, Tile};
use thiserror::Error;

/// Errors raised while encoding one tile.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A feature's geometry cannot be expressed in the tile format.
    #[error("degenerate geometry in layer '{layer}': {reason}")]
    DegenerateGeometry { layer: String, reason: String },

    /// The tile writer rejected the data.
    #[error("tile writer failed for layer '{layer}': {message}")]
    Writer { layer: String, message: String },
}

/// Turns the per-layer feature sets of one tile into bytes.
pub trait TileEncoder: Send + Sync {
    /// Encodes `layers`. Only called with a non-empty mapping.
    fn encode(&self, layers: &LayerTiles) -> Result<Vec<u8>, EncodeError>;
}

/// Mapbox Vector Tile encoder.
///
/// Every layer is written with the encoder's extent; feature sets built for a
/// different extent are rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MvtEncoder {
    extent: u32,
}

impl MvtEncoder {
    pub fn new(extent: u32) -> Self {
        Self {
            extent: extent.max(1),
        }
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    fn encode_layer(
        &self,
        tile: &Tile,
        name: &str,
        set: &FeatureSet,
    ) -> Result<Layer, EncodeError> {
        let scale = f64::from(self.extent) / f64::from(set.extent.max(1));
        let mut layer = tile.create_layer(name);
        for feature in &set.features {
            let mut out = encode_geometry(layer, &feature.geometry, scale).map_err(|e| match e {
                GeometryError::Degenerate(reason) => EncodeError::DegenerateGeometry {
                    layer: name.to_string(),
                    reason,
                },
                GeometryError::Writer(err) => writer_error(name, err),
            })?;
            if let Some(id) = feature.id {
                out.set_id(id);
            }
            add_properties(&mut out, feature);
            layer = out.into_layer();
        }
        Ok(layer)
    }
}

impl Default for MvtEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENT)
    }
}

impl TileEncoder for MvtEncoder {
    fn encode(&self, layers: &LayerTiles) -> Result<Vec<u8>, EncodeError> {
        let mut tile = Tile::new(self.extent);
        for (name, set) in layers {
            let layer = self.encode_layer(&tile, name, set)?;
            tile.add_layer(layer).map_err(|e| writer_error(name, e))?;
        }
        tile.to_bytes().map_err(|e| writer_error("*", e))
    }
}

fn writer_error(layer: &str, err: mvt::Error) -> EncodeError {
    EncodeError::Writer {
        layer: layer.to_string(),
        message: err.to_string(),
    }
}

enum GeometryError {
    Degenerate(String),
    Writer(mvt::Error),
}

impl From<mvt::Error> for GeometryError {
    fn from(err: mvt::Error) -> Self {
        GeometryError::Writer(err)
    }
}

fn scaled(point: &TilePoint, scale: f64) -> (f64, f64) {
    (
        (f64::from(point.x) * scale).round(),
        (f64::from(point.y) * scale).round(),
    )
}

/// Encodes one geometry and attaches it to `layer` as a new feature.
fn encode_geometry(
    layer: Layer,
    geometry: &TileGeometry,
    scale: f64,
) -> Result<mvt::Feature, GeometryError> {
    match geometry {
        TileGeometry::Points(points) => {
            if points.is_empty() {
                return Err(GeometryError::Degenerate("point feature without points".into()));
            }
            let mut encoder = GeomEncoder::new(GeomType::Point);
            for point in points {
                let (x, y) = scaled(point, scale);
                encoder = encoder.point(x, y)?;
            }
            Ok(layer.into_feature(encoder.encode()?))
        }
        TileGeometry::Lines(lines) => {
            let mut encoder = GeomEncoder::new(GeomType::Linestring);
            for line in lines {
                if line.len() < 2 {
                    return Err(GeometryError::Degenerate(format!(
                        "line with {} point(s)",
                        line.len()
                    )));
                }
                for point in line {
                    let (x, y) = scaled(point, scale);
                    encoder = encoder.point(x, y)?;
                }
                encoder = encoder.complete()?;
            }
            Ok(layer.into_feature(encoder.encode()?))
        }
        TileGeometry::Polygons(rings) => {
            let mut encoder = GeomEncoder::new(GeomType::Polygon);
            for ring in rings {
                if ring.len() < 3 {
                    return Err(GeometryError::Degenerate(format!(
                        "polygon ring with {} point(s)",
                        ring.len()
                    )));
                }
                for point in ring {
                    let (x, y) = scaled(point, scale);
                    encoder = encoder.point(x, y)?;
                }
                encoder = encoder.complete()?;
            }
            Ok(layer.into_feature(encoder.encode()?))
        }
    }
}

fn add_properties(out: &mut mvt::Feature, feature: &TileFeature) {
    for (key, value) in &feature.properties {
        match value {
            PropertyValue::String(s) => out.add_tag_string(key, s),
            PropertyValue::Double(v) => out.add_tag_double(key, *v),
            PropertyValue::Int(v) => out.add_tag_sint(key, *v),
            PropertyValue::UInt(v) => out.add_tag_uint(key, *v),
            PropertyValue::Bool(v) => out.add_tag_bool(key, *v),
        }
    }
}
