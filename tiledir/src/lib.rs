//! tiledir - static vector tile pyramids from GeoJSON layers
//!
//! Given a set of named layers, tiledir walks the implicit quad-tree of tile
//! coordinates from each layer's covering tile downwards. Wherever at least
//! one layer has content it writes a multi-layer vector tile to
//! `root/zoom/column/row.pbf` and descends into the four children; a tile
//! where every layer is empty ends that branch.
//!
//! # High-Level API
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use tiledir::adapter::LayerInput;
//! use tiledir::pyramid::{generate_pyramid, RunConfig};
//!
//! # async fn demo(points: serde_json::Value) -> Result<(), tiledir::pyramid::PyramidError> {
//! let mut layers = BTreeMap::new();
//! layers.insert("points".to_string(), LayerInput::Raw(points));
//! let summary = generate_pyramid(layers, RunConfig::new("tiles").with_max_zoom(10)).await?;
//! println!("{} tiles", summary.written);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`coord`]: tile addressing and Web Mercator math
//! - [`feature`], [`index`]: per-tile feature sets and the indexes producing them
//! - [`adapter`], [`assemble`], [`frontier`], [`pyramid`]: the walk itself
//! - [`encode`], [`sink`]: tile bytes and where they go
//! - [`hooks`], [`log`], [`logging`], [`config`]: instrumentation and setup

pub mod adapter;
pub mod assemble;
pub mod config;
pub mod coord;
pub mod encode;
pub mod feature;
pub mod frontier;
pub mod hooks;
pub mod index;
pub mod log;
pub mod logging;
pub mod pyramid;
pub mod sink;

/// Version of the library and CLI, shared across the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
