//! Layer input normalization.
//!
//! Callers hand over a mix of ready-made indexes and raw GeoJSON values. The
//! adapter resolves that mix once, up front, into a [`LayerMapping`] so the
//! walker never has to ask what kind of input a layer came from.

use crate::index::{IndexOptions, LayerIndex, LayerMapping, VectorIndex};
use crate::pyramid::PyramidError;
use geojson::GeoJson;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One layer as supplied by the caller.
#[derive(Clone)]
pub enum LayerInput {
    /// A GeoJSON document still to be indexed.
    Raw(Value),
    /// An index that already answers tile queries.
    Index(Arc<dyn LayerIndex>),
}

impl LayerInput {
    pub fn index<I: LayerIndex + 'static>(index: I) -> Self {
        LayerInput::Index(Arc::new(index))
    }
}

impl From<Value> for LayerInput {
    fn from(value: Value) -> Self {
        LayerInput::Raw(value)
    }
}

impl From<Arc<dyn LayerIndex>> for LayerInput {
    fn from(index: Arc<dyn LayerIndex>) -> Self {
        LayerInput::Index(index)
    }
}

impl std::fmt::Debug for LayerInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerInput::Raw(_) => f.write_str("LayerInput::Raw(..)"),
            LayerInput::Index(_) => f.write_str("LayerInput::Index(..)"),
        }
    }
}

/// Resolves every layer into a queryable index.
///
/// Indexes pass through untouched. Raw values are indexed with `options`
/// when they look like GeoJSON: an object with a `type` member and either
/// `features` or `geometry`.
///
/// # Errors
///
/// [`PyramidError::UnsupportedInputKind`] naming the first layer that is
/// neither.
pub fn normalize(
    inputs: BTreeMap<String, LayerInput>,
    options: &IndexOptions,
) -> Result<LayerMapping, PyramidError> {
    let mut mapping = LayerMapping::new();
    for (layer, input) in inputs {
        let index = match input {
            LayerInput::Index(index) => index,
            LayerInput::Raw(value) => {
                let geojson = parse_raw(&layer, value)?;
                let index = VectorIndex::from_geojson(&geojson, options);
                tracing::debug!(layer = %layer, features = index.feature_count(), "Indexed raw layer");
                Arc::new(index) as Arc<dyn LayerIndex>
            }
        };
        mapping.insert(layer, index);
    }
    Ok(mapping)
}

fn parse_raw(layer: &str, value: Value) -> Result<GeoJson, PyramidError> {
    let unsupported = |reason: String| PyramidError::UnsupportedInputKind {
        layer: layer.to_string(),
        reason,
    };
    let Some(object) = value.as_object() else {
        return Err(unsupported(format!("expected a JSON object, found {}", kind_of(&value))));
    };
    if !object.contains_key("type") {
        return Err(unsupported("object has no 'type' member".to_string()));
    }
    if !object.contains_key("features") && !object.contains_key("geometry") {
        return Err(unsupported(
            "object has neither 'features' nor 'geometry'".to_string(),
        ));
    }
    GeoJson::from_json_value(value).map_err(|e| unsupported(format!("invalid GeoJSON: {}", e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;
    use crate::index::PartitionedIndex;
    use serde_json::json;

    fn inputs(entries: Vec<(&str, LayerInput)>) -> BTreeMap<String, LayerInput> {
        entries
            .into_iter()
            .map(|(name, input)| (name.to_string(), input))
            .collect()
    }

    #[test]
    fn test_index_passes_through() {
        let index: Arc<dyn LayerIndex> = Arc::new(PartitionedIndex::new());
        let mapping = normalize(
            inputs(vec![("tiles", LayerInput::Index(Arc::clone(&index)))]),
            &IndexOptions::default(),
        )
        .unwrap();
        assert!(Arc::ptr_eq(&mapping["tiles"], &index));
    }

    #[test]
    fn test_feature_collection_is_indexed() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {},
                          "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}}]
        });
        let mapping = normalize(inputs(vec![("points", raw.into())]), &IndexOptions::default()).unwrap();
        assert!(mapping["points"].tile(TileCoord::ROOT).is_some());
    }

    #[test]
    fn test_single_feature_is_indexed() {
        let raw = json!({"type": "Feature", "properties": {},
                         "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}});
        assert!(normalize(inputs(vec![("one", raw.into())]), &IndexOptions::default()).is_ok());
    }

    #[test]
    fn test_untyped_object_is_rejected() {
        let raw = json!({"features": []});
        match normalize(inputs(vec![("bad", raw.into())]), &IndexOptions::default()) {
            Err(PyramidError::UnsupportedInputKind { layer, reason }) => {
                assert_eq!(layer, "bad");
                assert!(reason.contains("type"));
            }
            other => panic!("unexpected {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result = normalize(inputs(vec![("n", json!(42).into())]), &IndexOptions::default());
        assert!(matches!(result, Err(PyramidError::UnsupportedInputKind { .. })));
    }

    #[test]
    fn test_malformed_geojson_is_rejected() {
        let raw = json!({"type": "FeatureCollection", "features": "nope"});
        let result = normalize(inputs(vec![("broken", raw.into())]), &IndexOptions::default());
        assert!(matches!(result, Err(PyramidError::UnsupportedInputKind { .. })));
    }
}
