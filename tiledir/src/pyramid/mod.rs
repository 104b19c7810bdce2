//! Pyramid generation.
//!
//! [`generate_pyramid`] is the one-call entry point: it indexes raw layers,
//! works out where to start and walks the pyramid. [`PyramidWalker`] does
//! only the walk, for callers that already hold a [`LayerMapping`].
//!
//! # Visit order
//!
//! ```text
//!   before(c) ─► query layers ─┬─ all empty ──────────────► Empty
//!                              └─ encode ─► persist ─┬─ z == max ─► Leaf
//!                                                    └─ z < max ──► 4 children ─► Recursed
//!   release(c) on every layer ─► after(c, outcome)
//! ```
//!
//! Encoding or persistence errors end the branch as `Failed`; siblings keep
//! going and every failure is reported once the walk has settled.
//!
//! [`LayerMapping`]: crate::index::LayerMapping

mod config;
mod error;
mod walker;

pub use config::{RunConfig, DEFAULT_EXTENSION};
pub use error::{BranchError, BranchFailure, PyramidError, PyramidSummary};
pub use walker::PyramidWalker;

use crate::adapter::{normalize, LayerInput};
use std::collections::BTreeMap;

/// Indexes `inputs` and writes the pyramid they describe.
///
/// ```no_run
/// use std::collections::BTreeMap;
/// use tiledir::adapter::LayerInput;
/// use tiledir::pyramid::{generate_pyramid, RunConfig};
///
/// # async fn demo() -> Result<(), tiledir::pyramid::PyramidError> {
/// let mut layers = BTreeMap::new();
/// layers.insert(
///     "stops".to_string(),
///     LayerInput::Raw(serde_json::json!({"type": "FeatureCollection", "features": []})),
/// );
/// let summary = generate_pyramid(layers, RunConfig::new("tiles").with_max_zoom(14)).await?;
/// println!("{} tiles written", summary.written);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`PyramidWalker::run`]. Unsupported layers fail before any tile is
/// written.
pub async fn generate_pyramid(
    inputs: BTreeMap<String, LayerInput>,
    config: RunConfig,
) -> Result<PyramidSummary, PyramidError> {
    config.validate()?;
    let layers = normalize(inputs, config.index_options())?;
    PyramidWalker::new(layers, config).run().await
}
