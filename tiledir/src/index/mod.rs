//! Layer index abstraction.
//!
//! A [`LayerIndex`] answers "which features of this layer are visible at
//! z/x/y". The pyramid walker only ever talks to this trait, so raw GeoJSON,
//! clustered point sets and pre-partitioned tiles all look the same to it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PyramidWalker                           │
//! │            (depends on Arc<dyn LayerIndex>)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LayerIndex Trait                         │
//! │   tile(coord) / shape() / release(coord) / retained()       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼────────────────────┐
//!          ▼                   ▼                    ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────────┐
//! │  VectorIndex    │ │  ClusterIndex   │ │  PartitionedIndex   │
//! │  (GeoJSON clip) │ │  (point grid)   │ │  (pre-built tiles)  │
//! └─────────────────┘ └─────────────────┘ └─────────────────────┘
//! ```
//!
//! # Contract
//!
//! The walker stops descending at a tile where every layer is empty. An
//! index must therefore guarantee that emptiness at a coordinate implies
//! emptiness at every descendant, which holds for any index whose child tiles
//! are geometric subsets of the parent. An index that cannot promise this
//! (for example [`PartitionedIndex`]) must treat its own emptiness answer as
//! authoritative for the whole subtree.
//!
//! Indexes that cache per-coordinate state expose it through
//! [`LayerIndex::release`] and [`LayerIndex::retained`]; the walker releases
//! each coordinate once its subtree has settled.

mod cache;
mod clip;
mod cluster;
mod options;
mod partitioned;
mod source;
mod vector;

pub use cache::TileCache;
pub use cluster::{ClusterIndex, ClusterPoint};
pub use options::{ClusterOptions, IndexOptions};
pub use partitioned::PartitionedIndex;
pub use vector::VectorIndex;

use crate::coord::{BoundingBox, TileCoord};
use crate::feature::FeatureSet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// How an index describes the area it covers.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexShape {
    /// The index manages an explicit set of tiles.
    Tiles(Vec<TileCoord>),
    /// Bounding box of the index's source positions, `None` when it has none.
    Points(Option<BoundingBox>),
    /// The index exposes nothing the walker can start from.
    Opaque,
}

/// A queryable per-layer tile source shared across traversal branches.
pub trait LayerIndex: Send + Sync {
    /// Features visible at `coord`, or `None` when the layer has nothing there.
    ///
    /// Called concurrently from sibling branches; must not block on I/O.
    fn tile(&self, coord: TileCoord) -> Option<FeatureSet>;

    /// The coverage description used to seed the traversal frontier.
    fn shape(&self) -> IndexShape {
        IndexShape::Opaque
    }

    /// Drops any bookkeeping held for `coord`.
    ///
    /// Called once the coordinate's subtree has finished. Must be a no-op when
    /// nothing is held and safe to call concurrently for distinct coordinates.
    fn release(&self, _coord: TileCoord) {}

    /// Number of per-coordinate bookkeeping entries currently held.
    fn retained(&self) -> usize {
        0
    }
}

/// Layer name to index, built once per run.
pub type LayerMapping = BTreeMap<String, Arc<dyn LayerIndex>>;
