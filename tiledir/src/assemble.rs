//! Per-coordinate tile assembly.

use crate::coord::TileCoord;
use crate::encode::{EncodeError, TileEncoder};
use crate::feature::LayerTiles;
use crate::index::LayerMapping;

/// Queries every layer at `coord`, keeping only non-empty results.
pub fn layer_tiles(layers: &LayerMapping, coord: TileCoord) -> LayerTiles {
    let mut tiles = LayerTiles::new();
    for (name, index) in layers {
        match index.tile(coord) {
            Some(set) if !set.is_empty() => {
                tracing::trace!(layer = %name, tile = %coord, features = set.len(), "Layer populated");
                tiles.insert(name.clone(), set);
            }
            _ => tracing::trace!(layer = %name, tile = %coord, "Layer empty"),
        }
    }
    tiles
}

/// Encoded tile for `coord`, or `None` when every layer is empty there.
pub fn tile_buffer(
    layers: &LayerMapping,
    encoder: &dyn TileEncoder,
    coord: TileCoord,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let tiles = layer_tiles(layers, coord);
    if tiles.is_empty() {
        return Ok(None);
    }
    encoder.encode(&tiles).map(Some)
}
