//! Filesystem sink writing the `z/x/y.ext` hierarchy.

use super::pool::WritePool;
use super::{tile_path, SinkError, TileSink};
use crate::coord::TileCoord;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes each tile to `root/zoom/col/row.extension`.
///
/// Directories are created on demand and existing ones are fine. Each file is
/// written to a uniquely named sibling first and then renamed into place, so
/// readers never see a partial tile and two writers racing on the same
/// coordinate both succeed.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    extension: String,
    pool: WritePool,
    sequence: AtomicU64,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::with_pool(root, extension, WritePool::default())
    }

    pub fn with_pool(
        root: impl Into<PathBuf>,
        extension: impl Into<String>,
        pool: WritePool,
    ) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            pool,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn pool(&self) -> &WritePool {
        &self.pool
    }

    /// Final location of `coord`'s tile.
    pub fn path_for(&self, coord: &TileCoord) -> PathBuf {
        tile_path(&self.root, coord, &self.extension)
    }

    fn temp_path(&self, path: &Path) -> PathBuf {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SinkError + '_ {
    move |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TileSink for DirectorySink {
    fn persist(&self, coord: TileCoord, bytes: Vec<u8>) -> BoxFuture<'_, Result<(), SinkError>> {
        let path = self.path_for(&coord);
        let temp = self.temp_path(&path);
        Box::pin(async move {
            let _permit = self.pool.acquire().await;

            if let Some(dir) = path.parent() {
                tokio::fs::create_dir_all(dir).await.map_err(io_error(dir))?;
            }
            if let Err(source) = tokio::fs::write(&temp, &bytes).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(SinkError::Io { path: temp, source });
            }
            if let Err(source) = tokio::fs::rename(&temp, &path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(SinkError::Io { path, source });
            }
            tracing::trace!(tile = %coord, path = %path.display(), bytes = bytes.len(), "Tile written");
            Ok(())
        })
    }
}
