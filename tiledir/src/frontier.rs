//! Starting coordinates of a traversal.

use crate::coord::{bbox_to_tile, TileCoord};
use crate::index::{IndexShape, LayerIndex, LayerMapping};
use crate::pyramid::PyramidError;
use std::collections::BTreeSet;

/// Coordinates that together cover everything one layer holds.
///
/// Pre-partitioned indexes list their tiles; point-backed indexes start at
/// the smallest tile covering their bounding box. An index with no source
/// points yields no coordinates.
pub fn initial_coordinates(
    layer: &str,
    index: &dyn LayerIndex,
) -> Result<Vec<TileCoord>, PyramidError> {
    match index.shape() {
        IndexShape::Tiles(coords) => Ok(coords),
        IndexShape::Points(Some(bbox)) => Ok(vec![bbox_to_tile(&bbox)]),
        IndexShape::Points(None) => Ok(Vec::new()),
        IndexShape::Opaque => Err(PyramidError::UnrecognizedIndexShape {
            layer: layer.to_string(),
        }),
    }
}

/// The deduplicated frontier across all layers, in coordinate order.
///
/// Coordinates deeper than `max_zoom` are replaced by their ancestor at
/// `max_zoom`, so nothing below the walk's floor is ever visited.
pub fn frontier(layers: &LayerMapping, max_zoom: u8) -> Result<Vec<TileCoord>, PyramidError> {
    let mut coords = BTreeSet::new();
    for (name, index) in layers {
        for coord in initial_coordinates(name, index.as_ref())? {
            coords.insert(coord.ancestor_at(max_zoom.min(coord.zoom)));
        }
    }
    Ok(coords.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BoundingBox;
    use crate::feature::FeatureSet;
    use std::sync::Arc;

    struct ShapeOnly(IndexShape);

    impl LayerIndex for ShapeOnly {
        fn tile(&self, _coord: TileCoord) -> Option<FeatureSet> {
            None
        }

        fn shape(&self) -> IndexShape {
            self.0.clone()
        }
    }

    struct Opaque;

    impl LayerIndex for Opaque {
        fn tile(&self, _coord: TileCoord) -> Option<FeatureSet> {
            None
        }
    }

    fn coord(zoom: u8, col: u32, row: u32) -> TileCoord {
        TileCoord::new(zoom, col, row).unwrap()
    }

    fn mapping(entries: Vec<(&str, Arc<dyn LayerIndex>)>) -> LayerMapping {
        entries
            .into_iter()
            .map(|(name, index)| (name.to_string(), index))
            .collect()
    }

    #[test]
    fn test_tiles_shape_returned_verbatim() {
        let coords = vec![coord(3, 1, 2), coord(2, 0, 0)];
        let index = ShapeOnly(IndexShape::Tiles(coords.clone()));
        assert_eq!(initial_coordinates("t", &index).unwrap(), coords);
    }

    #[test]
    fn test_world_bbox_starts_at_root() {
        let bbox = BoundingBox {
            west: -170.0,
            south: -60.0,
            east: 170.0,
            north: 60.0,
        };
        let index = ShapeOnly(IndexShape::Points(Some(bbox)));
        assert_eq!(initial_coordinates("p", &index).unwrap(), vec![TileCoord::ROOT]);
    }

    #[test]
    fn test_empty_source_has_no_frontier() {
        let index = ShapeOnly(IndexShape::Points(None));
        assert!(initial_coordinates("p", &index).unwrap().is_empty());
    }

    #[test]
    fn test_opaque_index_is_rejected() {
        match initial_coordinates("mystery", &Opaque) {
            Err(PyramidError::UnrecognizedIndexShape { layer }) => assert_eq!(layer, "mystery"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shared_roots_are_deduplicated() {
        let world = BoundingBox {
            west: -100.0,
            south: -10.0,
            east: 100.0,
            north: 10.0,
        };
        let layers = mapping(vec![
            ("a", Arc::new(ShapeOnly(IndexShape::Points(Some(world))))),
            ("b", Arc::new(ShapeOnly(IndexShape::Points(Some(world))))),
            ("c", Arc::new(ShapeOnly(IndexShape::Tiles(vec![TileCoord::ROOT, coord(1, 1, 1)])))),
        ]);
        assert_eq!(
            frontier(&layers, 24).unwrap(),
            vec![TileCoord::ROOT, coord(1, 1, 1)]
        );
    }

    #[test]
    fn test_deep_coordinates_are_lifted_to_max_zoom() {
        let layers = mapping(vec![(
            "t",
            Arc::new(ShapeOnly(IndexShape::Tiles(vec![coord(5, 31, 0), coord(5, 30, 1)]))),
        )]);
        assert_eq!(frontier(&layers, 2).unwrap(), vec![coord(2, 3, 0)]);
    }
}
