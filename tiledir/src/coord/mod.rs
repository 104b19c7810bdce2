//! Coordinate conversion module
//!
//! Tile addressing for the pyramid walk: quad-tree navigation between
//! [`TileCoord`]s, conversion between geographic positions and tiles, and the
//! minimal covering tile of a bounding box.

mod types;

pub use types::{
    BoundingBox, CoordError, TileCoord, MAX_LAT, MAX_LON, MAX_PYRAMID_ZOOM, MAX_TILE_ZOOM,
    MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Zoom at which corner tiles are compared when searching for a covering tile.
const COVER_SEARCH_ZOOM: u32 = 32;

/// Projects a geographic position to unit Web Mercator space.
///
/// Both axes are in `[0, 1]`, with `(0, 0)` at the north-west corner of the
/// world. Latitude is clamped to the Web Mercator range and longitude to
/// `[-180, 180]`.
#[inline]
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    let lon = lon.clamp(MIN_LON, MAX_LON);
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat * PI / 180.0;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0;
    (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
}

/// Inverse of [`project`]: unit Web Mercator back to `(lon, lat)` degrees.
#[inline]
pub fn unproject(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    (lon, lat_rad * 180.0 / PI)
}

/// Converts a geographic position to the tile containing it.
///
/// Positions outside the Web Mercator range are clamped onto its edge, so
/// only the zoom can be rejected.
pub fn lon_lat_to_tile(lon: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if zoom > MAX_TILE_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    let (x, y) = project(lon, lat);
    let n = 1u64 << zoom;
    Ok(TileCoord {
        zoom,
        col: unit_to_index(x, n) as u32,
        row: unit_to_index(y, n) as u32,
    })
}

/// Returns the `(lon, lat)` of the tile's north-west corner.
#[inline]
pub fn tile_to_lon_lat(tile: &TileCoord) -> (f64, f64) {
    let n = tile.tiles_per_axis() as f64;
    unproject(tile.col as f64 / n, tile.row as f64 / n)
}

/// Finds the smallest single tile that contains the whole bounding box.
///
/// Both corners are located at a very deep zoom and the shared prefix of
/// their column and row bits gives the covering zoom. The result is capped at
/// [`MAX_TILE_ZOOM`]; boxes straddling the zoom-1 split resolve to the root.
pub fn bbox_to_tile(bbox: &BoundingBox) -> TileCoord {
    let n = 1u64 << COVER_SEARCH_ZOOM;
    let (min_x, min_y) = project(bbox.west, bbox.north);
    let (max_x, max_y) = project(bbox.east, bbox.south);
    let (x0, y0) = (unit_to_index(min_x, n), unit_to_index(min_y, n));
    let (x1, y1) = (unit_to_index(max_x, n), unit_to_index(max_y, n));

    let mut zoom = 0u32;
    while zoom < u32::from(MAX_TILE_ZOOM) {
        let mask = 1u64 << (COVER_SEARCH_ZOOM - (zoom + 1));
        if (x0 & mask) != (x1 & mask) || (y0 & mask) != (y1 & mask) {
            break;
        }
        zoom += 1;
    }

    let shift = COVER_SEARCH_ZOOM - zoom;
    TileCoord {
        zoom: zoom as u8,
        col: (x0 >> shift) as u32,
        row: (y0 >> shift) as u32,
    }
}

/// Bounds of a tile in unit Web Mercator space as `(min_x, min_y, max_x, max_y)`.
#[inline]
pub fn tile_unit_bounds(tile: &TileCoord) -> (f64, f64, f64, f64) {
    let n = tile.tiles_per_axis() as f64;
    (
        tile.col as f64 / n,
        tile.row as f64 / n,
        (tile.col + 1) as f64 / n,
        (tile.row + 1) as f64 / n,
    )
}

/// Scales a unit coordinate to a grid index, keeping the far edge inside the grid.
#[inline]
fn unit_to_index(unit: f64, n: u64) -> u64 {
    ((unit * n as f64).floor() as u64).min(n - 1)
}

#[cfg(test)]
mod tests;
