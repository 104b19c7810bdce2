//! Tests for coordinate conversion

use super::*;

#[test]
fn test_new_york_city_at_zoom_16() {
    let tile = lon_lat_to_tile(-74.0060, 40.7128, 16).unwrap();
    assert_eq!(tile.col, 19295, "NYC longitude should map to col 19295");
    assert_eq!(tile.row, 24640, "NYC latitude should map to row 24640");
    assert_eq!(tile.zoom, 16);
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1: 2x2 tiles, 0/0 sits on the corner of the south-east tile
    let tile = lon_lat_to_tile(0.0, 0.0, 1).unwrap();
    assert_eq!(tile.col, 1);
    assert_eq!(tile.row, 1);
}

#[test]
fn test_out_of_range_positions_are_clamped() {
    let tile = lon_lat_to_tile(180.0, -90.0, 3).unwrap();
    assert_eq!(tile.col, 7);
    assert_eq!(tile.row, 7);

    let tile = lon_lat_to_tile(-181.0, 90.0, 3).unwrap();
    assert_eq!(tile.col, 0);
    assert_eq!(tile.row, 0);
}

#[test]
fn test_invalid_zoom_too_high() {
    let result = lon_lat_to_tile(0.0, 0.0, 29);
    assert!(matches!(result.unwrap_err(), CoordError::InvalidZoom(29)));
}

#[test]
fn test_new_validates_grid() {
    assert!(TileCoord::new(2, 3, 3).is_ok());
    assert!(matches!(
        TileCoord::new(2, 4, 0).unwrap_err(),
        CoordError::OutOfRange { .. }
    ));
    assert!(matches!(
        TileCoord::new(30, 0, 0).unwrap_err(),
        CoordError::InvalidZoom(30)
    ));
}

#[test]
fn test_children_partition_parent() {
    let tile = TileCoord::new(3, 5, 2).unwrap();
    let children = tile.children();
    assert_eq!(
        children,
        [
            TileCoord::new(4, 10, 4).unwrap(),
            TileCoord::new(4, 11, 4).unwrap(),
            TileCoord::new(4, 11, 5).unwrap(),
            TileCoord::new(4, 10, 5).unwrap(),
        ]
    );
    for child in children {
        assert_eq!(child.parent(), Some(tile));
        assert!(tile.is_ancestor_of(&child));
    }
}

#[test]
fn test_root_has_no_parent() {
    assert_eq!(TileCoord::ROOT.parent(), None);
    assert!(!TileCoord::ROOT.is_ancestor_of(&TileCoord::ROOT));
}

#[test]
fn test_ancestor_at() {
    let tile = TileCoord::new(10, 700, 300).unwrap();
    assert_eq!(tile.ancestor_at(0), TileCoord::ROOT);
    assert_eq!(tile.ancestor_at(8), TileCoord::new(8, 175, 75).unwrap());
    assert_eq!(tile.ancestor_at(12), tile);
}

#[test]
fn test_display_is_slippy_path() {
    let tile = TileCoord::new(4, 3, 9).unwrap();
    assert_eq!(tile.to_string(), "4/3/9");
}

#[test]
fn test_ordering_is_zoom_major() {
    let mut tiles = vec![
        TileCoord::new(2, 0, 0).unwrap(),
        TileCoord::ROOT,
        TileCoord::new(1, 1, 0).unwrap(),
    ];
    tiles.sort();
    assert_eq!(tiles[0], TileCoord::ROOT);
    assert_eq!(tiles[2].zoom, 2);
}

#[test]
fn test_bbox_to_tile_whole_world_is_root() {
    let bbox = BoundingBox {
        west: -180.0,
        south: -85.0,
        east: 180.0,
        north: 85.0,
    };
    assert_eq!(bbox_to_tile(&bbox), TileCoord::ROOT);
}

#[test]
fn test_bbox_to_tile_small_box() {
    // A box well inside the zoom-16 tile of NYC
    let bbox = BoundingBox {
        west: -74.0055,
        south: 40.7125,
        east: -74.0050,
        north: 40.7128,
    };
    let tile = bbox_to_tile(&bbox);
    assert!(tile.zoom >= 16, "expected a deep tile, got {}", tile);
    let nyc = lon_lat_to_tile(-74.0052, 40.7126, tile.zoom).unwrap();
    assert_eq!(tile, nyc);
}

#[test]
fn test_bbox_to_tile_single_point_caps_at_max_zoom() {
    let bbox = BoundingBox::point(10.0, 10.0);
    let tile = bbox_to_tile(&bbox);
    assert_eq!(tile.zoom, MAX_TILE_ZOOM);
    assert_eq!(tile, lon_lat_to_tile(10.0, 10.0, MAX_TILE_ZOOM).unwrap());
}

#[test]
fn test_bbox_to_tile_contains_both_corners() {
    let bbox = BoundingBox {
        west: 2.0,
        south: 48.0,
        east: 3.0,
        north: 49.0,
    };
    let tile = bbox_to_tile(&bbox);
    let sw = lon_lat_to_tile(2.0, 48.0, tile.zoom).unwrap();
    let ne = lon_lat_to_tile(3.0, 49.0, tile.zoom).unwrap();
    assert_eq!(sw, tile);
    assert_eq!(ne, tile);
    // One level deeper the corners no longer share a tile
    let sw = lon_lat_to_tile(2.0, 48.0, tile.zoom + 1).unwrap();
    let ne = lon_lat_to_tile(3.0, 49.0, tile.zoom + 1).unwrap();
    assert_ne!(sw, ne);
}

#[test]
fn test_bounding_box_from_points() {
    assert!(BoundingBox::from_points(Vec::new()).is_none());
    let bbox = BoundingBox::from_points(vec![(1.0, 2.0), (-3.0, 5.0), (0.0, -1.0)]).unwrap();
    assert_eq!(bbox.west, -3.0);
    assert_eq!(bbox.east, 1.0);
    assert_eq!(bbox.south, -1.0);
    assert_eq!(bbox.north, 5.0);
}

#[test]
fn test_project_roundtrip() {
    for (lon, lat) in [(0.0, 0.0), (-74.006, 40.7128), (151.2, -33.86)] {
        let (x, y) = project(lon, lat);
        let (lon2, lat2) = unproject(x, y);
        assert!((lon - lon2).abs() < 1e-9, "lon {} -> {}", lon, lon2);
        assert!((lat - lat2).abs() < 1e-9, "lat {} -> {}", lat, lat2);
    }
}

#[test]
fn test_tile_to_lon_lat_northwest_corner() {
    let tile = TileCoord::new(1, 1, 1).unwrap();
    let (lon, lat) = tile_to_lon_lat(&tile);
    assert!(lon.abs() < 1e-9);
    assert!(lat.abs() < 1e-9);
}

#[test]
fn test_tile_unit_bounds() {
    let tile = TileCoord::new(2, 1, 3).unwrap();
    assert_eq!(tile_unit_bounds(&tile), (0.25, 0.75, 0.5, 1.0));
}
