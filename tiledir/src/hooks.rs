//! Observer callbacks around each visited coordinate.

use crate::coord::TileCoord;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How the visit of one coordinate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitOutcome {
    /// Every layer was empty; nothing written, no recursion.
    Empty,
    /// Tile written at the deepest zoom.
    Leaf,
    /// Tile written and all four children settled.
    Recursed,
    /// Encoding or persistence failed; the subtree was abandoned.
    Failed,
}

impl std::fmt::Display for VisitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisitOutcome::Empty => write!(f, "empty"),
            VisitOutcome::Leaf => write!(f, "leaf"),
            VisitOutcome::Recursed => write!(f, "recursed"),
            VisitOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Life-cycle callbacks awaited by the walker.
///
/// `before` runs ahead of the tile query, `after` once the coordinate (and
/// its subtree, when it recursed) has settled, whatever the outcome.
pub trait TraversalHooks: Send + Sync {
    fn before(&self, _coord: TileCoord) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }

    fn after(&self, _coord: TileCoord, _outcome: VisitOutcome) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHooks;

impl TraversalHooks for NoOpHooks {}

/// Counting hooks for instrumentation.
#[derive(Debug, Default)]
pub struct TraversalStats {
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    started: AtomicUsize,
    empty: AtomicUsize,
    leaf: AtomicUsize,
    recursed: AtomicUsize,
    failed: AtomicUsize,
}

/// Point-in-time copy of [`TraversalStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalSnapshot {
    pub in_flight: usize,
    pub peak_in_flight: usize,
    pub started: usize,
    pub empty: usize,
    pub leaf: usize,
    pub recursed: usize,
    pub failed: usize,
}

impl TraversalSnapshot {
    /// Coordinates that reached `after`.
    pub fn finished(&self) -> usize {
        self.empty + self.leaf + self.recursed + self.failed
    }
}

impl TraversalStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TraversalSnapshot {
        TraversalSnapshot {
            in_flight: self.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
            started: self.started.load(Ordering::SeqCst),
            empty: self.empty.load(Ordering::SeqCst),
            leaf: self.leaf.load(Ordering::SeqCst),
            recursed: self.recursed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }

    fn update_peak(&self, current: usize) {
        let mut peak = self.peak_in_flight.load(Ordering::SeqCst);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }
}

impl TraversalHooks for TraversalStats {
    fn before(&self, _coord: TileCoord) -> BoxFuture<'_, ()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.update_peak(current);
        Box::pin(async {})
    }

    fn after(&self, _coord: TileCoord, outcome: VisitOutcome) -> BoxFuture<'_, ()> {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let counter = match outcome {
            VisitOutcome::Empty => &self.empty,
            VisitOutcome::Leaf => &self.leaf,
            VisitOutcome::Recursed => &self.recursed,
            VisitOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_track_outcomes_and_peak() {
        let stats = TraversalStats::new();
        let child = TileCoord::new(1, 0, 0).unwrap();

        stats.before(TileCoord::ROOT).await;
        stats.before(child).await;
        stats.after(child, VisitOutcome::Leaf).await;
        stats.after(TileCoord::ROOT, VisitOutcome::Recursed).await;

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.started, 2);
        assert_eq!(snapshot.finished(), 2);
        assert_eq!(snapshot.in_flight, 0);
        assert_eq!(snapshot.peak_in_flight, 2);
        assert_eq!(snapshot.leaf, 1);
        assert_eq!(snapshot.recursed, 1);
    }

    #[tokio::test]
    async fn test_noop_hooks_complete() {
        NoOpHooks.before(TileCoord::ROOT).await;
        NoOpHooks.after(TileCoord::ROOT, VisitOutcome::Empty).await;
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(VisitOutcome::Recursed.to_string(), "recursed");
    }
}
