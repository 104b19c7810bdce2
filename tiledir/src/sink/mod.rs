//! Tile persistence.
//!
//! The walker hands each encoded tile to a [`TileSink`] and only cares about
//! the completion signal. Sinks must tolerate being asked to store the same
//! coordinate more than once.
//!
//! - [`DirectorySink`] writes `root/z/x/y.ext` files
//! - [`MemorySink`] keeps tiles in a concurrent map

mod directory;
mod memory;
mod pool;

pub use directory::DirectorySink;
pub use memory::MemorySink;
pub use pool::{WritePermit, WritePool, DEFAULT_MAX_CONCURRENT_WRITES};

use crate::coord::TileCoord;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sink rejected tile {coord}: {reason}")]
    Rejected { coord: TileCoord, reason: String },
}

/// Destination for encoded tiles.
pub trait TileSink: Send + Sync {
    /// Stores `bytes` for `coord`.
    ///
    /// Success means the bytes are durably associated with the coordinate.
    /// Storing the same coordinate twice must not fail.
    fn persist(&self, coord: TileCoord, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), SinkError>>;
}

/// Path of a tile file below `root`.
///
/// ```
/// use std::path::PathBuf;
/// use tiledir::coord::TileCoord;
/// use tiledir::sink::tile_path;
///
/// let tile = TileCoord::new(3, 5, 2).unwrap();
/// assert_eq!(
///     tile_path(&PathBuf::from("/out"), &tile, "pbf"),
///     PathBuf::from("/out/3/5/2.pbf")
/// );
/// ```
pub fn tile_path(root: &Path, coord: &TileCoord, extension: &str) -> PathBuf {
    column_dir(root, coord).join(format!("{}.{}", coord.row, extension))
}

/// Directory holding every row of the tile's column.
pub fn column_dir(root: &Path, coord: &TileCoord) -> PathBuf {
    root.join(coord.zoom.to_string()).join(coord.col.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_path_layout() {
        let coord = TileCoord::new(12, 2048, 1361).unwrap();
        assert_eq!(
            tile_path(Path::new("tiles"), &coord, "mvt"),
            PathBuf::from("tiles/12/2048/1361.mvt")
        );
    }

    #[test]
    fn test_column_dir_is_parent_of_tile_path() {
        let coord = TileCoord::new(2, 3, 1).unwrap();
        let root = Path::new("/out");
        assert_eq!(
            tile_path(root, &coord, "pbf").parent(),
            Some(column_dir(root, &coord).as_path())
        );
    }

    #[test]
    fn test_error_display_names_path() {
        let err = SinkError::Io {
            path: PathBuf::from("/out/0/0/0.pbf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to write /out/0/0/0.pbf: denied");
    }
}
