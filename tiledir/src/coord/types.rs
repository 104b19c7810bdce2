//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Deepest zoom a [`TileCoord`] can address.
pub const MAX_TILE_ZOOM: u8 = 28;

/// Deepest zoom a pyramid run will ever descend to.
pub const MAX_PYRAMID_ZOOM: u8 = 24;

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// Ordering is by zoom first, then column, then row, so sorted collections
/// list shallow tiles before deep ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level (0-28)
    pub zoom: u8,
    /// X coordinate (west to east), 0 at the antimeridian
    pub col: u32,
    /// Y coordinate (north to south), 0 at north
    pub row: u32,
}

impl TileCoord {
    /// The single tile covering the whole world.
    pub const ROOT: TileCoord = TileCoord {
        zoom: 0,
        col: 0,
        row: 0,
    };

    /// Create a validated tile coordinate.
    pub fn new(zoom: u8, col: u32, row: u32) -> Result<Self, CoordError> {
        if zoom > MAX_TILE_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = 1u64 << zoom;
        if u64::from(col) >= n || u64::from(row) >= n {
            return Err(CoordError::OutOfRange { zoom, col, row });
        }
        Ok(Self { zoom, col, row })
    }

    /// Number of tiles along one axis at this tile's zoom.
    #[inline]
    pub fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom
    }

    /// The four tiles one zoom level deeper that partition this tile.
    ///
    /// Order: north-west, north-east, south-east, south-west.
    #[inline]
    pub fn children(&self) -> [TileCoord; 4] {
        let zoom = self.zoom + 1;
        let col = self.col * 2;
        let row = self.row * 2;
        [
            TileCoord { zoom, col, row },
            TileCoord {
                zoom,
                col: col + 1,
                row,
            },
            TileCoord {
                zoom,
                col: col + 1,
                row: row + 1,
            },
            TileCoord {
                zoom,
                col,
                row: row + 1,
            },
        ]
    }

    /// The tile one zoom level shallower containing this tile.
    #[inline]
    pub fn parent(&self) -> Option<TileCoord> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileCoord {
            zoom: self.zoom - 1,
            col: self.col >> 1,
            row: self.row >> 1,
        })
    }

    /// The tile at `zoom` containing this tile, or itself when `zoom` is not shallower.
    #[inline]
    pub fn ancestor_at(&self, zoom: u8) -> TileCoord {
        if zoom >= self.zoom {
            return *self;
        }
        let shift = self.zoom - zoom;
        TileCoord {
            zoom,
            col: self.col >> shift,
            row: self.row >> shift,
        }
    }

    /// Whether `other` lies strictly inside this tile's subtree.
    pub fn is_ancestor_of(&self, other: &TileCoord) -> bool {
        other.zoom > self.zoom && other.ancestor_at(self.zoom) == *self
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// A box around a single position.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            west: lon,
            south: lat,
            east: lon,
            north: lat,
        }
    }

    /// Grow the box to include a position.
    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.west = self.west.min(lon);
        self.east = self.east.max(lon);
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
    }

    /// Grow the box to include another box.
    pub fn union(&mut self, other: &BoundingBox) {
        self.extend(other.west, other.south);
        self.extend(other.east, other.north);
    }

    /// Bounding box of a position list, `None` when the list is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (lon, lat) = iter.next()?;
        let mut bbox = Self::point(lon, lat);
        for (lon, lat) in iter {
            bbox.extend(lon, lat);
        }
        Some(bbox)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is above [`MAX_TILE_ZOOM`]
    InvalidZoom(u8),
    /// Column or row does not exist at the given zoom
    OutOfRange { zoom: u8, col: u32, row: u32 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between 0 and {})",
                    zoom, MAX_TILE_ZOOM
                )
            }
            CoordError::OutOfRange { zoom, col, row } => {
                write!(
                    f,
                    "Tile {}/{}/{} is outside the {}x{} grid of zoom {}",
                    zoom,
                    col,
                    row,
                    1u64 << zoom,
                    1u64 << zoom,
                    zoom
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
