//! The emptiness-pruned quad-tree walk.

use super::config::RunConfig;
use super::error::{BranchError, BranchFailure, PyramidError, PyramidSummary};
use crate::assemble::tile_buffer;
use crate::coord::TileCoord;
use crate::encode::TileEncoder;
use crate::frontier::frontier;
use crate::hooks::{TraversalHooks, VisitOutcome};
use crate::index::LayerMapping;
use crate::log::Logger;
use crate::sink::TileSink;
use crate::{log_debug, log_info, log_warn};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Walks the tile pyramid of a layer mapping and persists every non-empty tile.
///
/// Each coordinate is visited as its own task: query all layers, persist
/// the encoded tile, then visit the four children concurrently. A coordinate
/// where every layer is empty ends its branch. Once a coordinate's subtree
/// has settled its per-layer bookkeeping is released.
///
/// Branch failures never cancel siblings. They are collected and reported
/// together once everything has finished.
///
/// A frontier coordinate that lies below another one is walked only from its
/// own root; the ancestor's branch does not descend into it again.
pub struct PyramidWalker {
    layers: LayerMapping,
    config: RunConfig,
}

struct Walk {
    layers: LayerMapping,
    roots: BTreeSet<TileCoord>,
    sink: Arc<dyn TileSink>,
    encoder: Arc<dyn TileEncoder>,
    hooks: Arc<dyn TraversalHooks>,
    logger: Arc<dyn Logger>,
    max_zoom: u8,
    visited: AtomicUsize,
    written: AtomicUsize,
    empty: AtomicUsize,
    failed: AtomicUsize,
}

impl PyramidWalker {
    pub fn new(layers: LayerMapping, config: RunConfig) -> Self {
        Self { layers, config }
    }

    pub fn layers(&self) -> &LayerMapping {
        &self.layers
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the walk to completion.
    ///
    /// # Errors
    ///
    /// Configuration and index-shape problems are reported before anything is
    /// written. Branch failures are reported as
    /// [`PyramidError::BranchesFailed`] after all branches have settled.
    pub async fn run(self) -> Result<PyramidSummary, PyramidError> {
        self.config.validate()?;
        let max_zoom = self.config.max_zoom();
        let start = frontier(&self.layers, max_zoom)?;
        let logger = Arc::clone(self.config.logger());

        log_info!(
            logger,
            "Walking {} layer(s) from {} frontier tile(s) down to zoom {}",
            self.layers.len(),
            start.len(),
            max_zoom
        );

        let walk = Arc::new(Walk {
            sink: self.config.resolve_sink(),
            encoder: self.config.resolve_encoder(),
            hooks: Arc::clone(self.config.hooks()),
            logger: Arc::clone(&logger),
            layers: self.layers,
            roots: start.iter().copied().collect(),
            max_zoom,
            visited: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
            empty: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        });

        let failures = settle_all(&walk, TileCoord::ROOT, start.iter().copied()).await;

        let summary = PyramidSummary {
            frontier: start.len(),
            visited: walk.visited.load(Ordering::SeqCst),
            written: walk.written.load(Ordering::SeqCst),
            empty: walk.empty.load(Ordering::SeqCst),
            failed: walk.failed.load(Ordering::SeqCst),
        };

        if failures.is_empty() {
            log_info!(
                logger,
                "Pyramid complete: {} visited, {} written, {} empty",
                summary.visited,
                summary.written,
                summary.empty
            );
            Ok(summary)
        } else {
            log_warn!(
                logger,
                "Pyramid finished with {} failed branch(es); {} tile(s) written",
                failures.len(),
                summary.written
            );
            Err(PyramidError::BranchesFailed { failures, summary })
        }
    }
}

/// Visits `coords` concurrently and gathers every failure beneath them.
///
/// `parent` labels failures of tasks that could not report their own
/// coordinate.
async fn settle_all(
    walk: &Arc<Walk>,
    parent: TileCoord,
    coords: impl Iterator<Item = TileCoord>,
) -> Vec<BranchFailure> {
    let mut branches = JoinSet::new();
    for coord in coords {
        let walk = Arc::clone(walk);
        branches.spawn(async move {
            let result = AssertUnwindSafe(visit(walk, coord)).catch_unwind().await;
            (coord, result)
        });
    }

    let mut failures = Vec::new();
    while let Some(joined) = branches.join_next().await {
        match joined {
            Ok((_, Ok(mut nested))) => failures.append(&mut nested),
            Ok((coord, Err(panic))) => {
                walk.failed.fetch_add(1, Ordering::SeqCst);
                let message = panic_message(panic.as_ref());
                log_warn!(walk.logger, "Tile {} panicked: {}", coord, message);
                finish_panicked(walk, coord).await;
                failures.push(BranchFailure {
                    coord,
                    error: BranchError::Panicked(message),
                });
            }
            Err(join_error) => {
                walk.failed.fetch_add(1, Ordering::SeqCst);
                failures.push(BranchFailure {
                    coord: parent,
                    error: BranchError::Panicked(join_error.to_string()),
                });
            }
        }
    }
    failures
}

/// One coordinate's full life cycle. Boxed because it recurses.
fn visit(walk: Arc<Walk>, coord: TileCoord) -> BoxFuture<'static, Vec<BranchFailure>> {
    async move {
        walk.hooks.before(coord).await;
        walk.visited.fetch_add(1, Ordering::SeqCst);

        let mut failures = Vec::new();
        let outcome = match persist_tile(&walk, coord).await {
            Ok(false) => {
                walk.empty.fetch_add(1, Ordering::SeqCst);
                VisitOutcome::Empty
            }
            Ok(true) if coord.zoom < walk.max_zoom => {
                let children: Vec<TileCoord> = coord
                    .children()
                    .into_iter()
                    .filter(|child| !walk.roots.contains(child))
                    .collect();
                failures = settle_all(&walk, coord, children.into_iter()).await;
                VisitOutcome::Recursed
            }
            Ok(true) => VisitOutcome::Leaf,
            Err(error) => {
                walk.failed.fetch_add(1, Ordering::SeqCst);
                log_warn!(walk.logger, "Tile {} failed: {}", coord, error);
                failures.push(BranchFailure { coord, error });
                VisitOutcome::Failed
            }
        };

        release_layers(&walk, coord);
        log_debug!(walk.logger, "Tile {} {}", coord, outcome);
        walk.hooks.after(coord, outcome).await;
        failures
    }
    .boxed()
}

fn release_layers(walk: &Walk, coord: TileCoord) {
    for index in walk.layers.values() {
        index.release(coord);
    }
}

/// Cleanup for a visit that panicked before reaching its own release and
/// `after` hook. A second panic here is swallowed; the first is reported.
async fn finish_panicked(walk: &Walk, coord: TileCoord) {
    let _ = std::panic::catch_unwind(AssertUnwindSafe(|| release_layers(walk, coord)));
    let after = std::panic::catch_unwind(AssertUnwindSafe(|| {
        walk.hooks.after(coord, VisitOutcome::Failed)
    }));
    if let Ok(after) = after {
        let _ = AssertUnwindSafe(after).catch_unwind().await;
    }
}

/// Assembles and stores the tile at `coord`. Returns whether one was written.
async fn persist_tile(walk: &Walk, coord: TileCoord) -> Result<bool, BranchError> {
    let Some(bytes) = tile_buffer(&walk.layers, walk.encoder.as_ref(), coord)? else {
        return Ok(false);
    };
    walk.sink.persist(coord, bytes).await?;
    walk.written.fetch_add(1, Ordering::SeqCst);
    Ok(true)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
