//! Error types for a pyramid run.

use crate::coord::TileCoord;
use crate::encode::EncodeError;
use crate::sink::SinkError;
use serde::Serialize;
use thiserror::Error;

/// Counters describing what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PyramidSummary {
    /// Coordinates the walk started from.
    pub frontier: usize,
    /// Coordinates visited, including empty ones.
    pub visited: usize,
    /// Tiles handed to the sink successfully.
    pub written: usize,
    /// Coordinates where every layer was empty.
    pub empty: usize,
    /// Coordinates whose branch failed.
    pub failed: usize,
}

/// Why a single branch was abandoned.
#[derive(Debug, Error)]
pub enum BranchError {
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    #[error("persist failed: {0}")]
    Persist(#[from] SinkError),

    #[error("branch panicked: {0}")]
    Panicked(String),
}

/// A failed coordinate and the reason its subtree was not written.
#[derive(Debug, Error)]
#[error("tile {coord}: {error}")]
pub struct BranchFailure {
    pub coord: TileCoord,
    #[source]
    pub error: BranchError,
}

/// Errors returned by [`generate_pyramid`](super::generate_pyramid) and
/// [`PyramidWalker::run`](super::PyramidWalker::run).
#[derive(Debug, Error)]
pub enum PyramidError {
    /// A raw layer is neither an index nor recognizable GeoJSON.
    #[error("layer '{layer}' has an unsupported input kind: {reason}")]
    UnsupportedInputKind { layer: String, reason: String },

    /// An index gives no way to find where the walk should start.
    #[error("layer '{layer}' does not describe its coverage (no tile list or point set)")]
    UnrecognizedIndexShape { layer: String },

    #[error("invalid run configuration: {0}")]
    InvalidConfig(String),

    /// Some branches failed after the whole pyramid settled.
    #[error("{} branch(es) failed; {} tile(s) written", failures.len(), summary.written)]
    BranchesFailed {
        failures: Vec<BranchFailure>,
        summary: PyramidSummary,
    },
}

impl PyramidError {
    /// Whether some tiles were written despite the failure.
    pub fn is_partial(&self) -> bool {
        matches!(self, PyramidError::BranchesFailed { summary, .. } if summary.written > 0)
    }

    /// Branch failures, empty for configuration errors.
    pub fn failures(&self) -> &[BranchFailure] {
        match self {
            PyramidError::BranchesFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}
