//! Bounded concurrency for tile writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of tile writes allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_WRITES: usize = 64;

/// Semaphore-backed limit on simultaneous file writes.
///
/// The walk fans out four ways per level, so without a limit a wide pyramid
/// would open thousands of files at once.
#[derive(Debug)]
pub struct WritePool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl WritePool {
    /// Creates a pool. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Waits for a free write slot.
    ///
    /// Returns `None` only if the semaphore was closed, which this pool never
    /// does.
    pub async fn acquire(&self) -> Option<WritePermit<'_>> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await.ok()?;
        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);
        Some(WritePermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Highest number of simultaneous writes observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }
}

impl Default for WritePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_WRITES)
    }
}

/// A held write slot, released on drop.
pub struct WritePermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for WritePermit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritePermit").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permit_counts_in_flight() {
        let pool = WritePool::new(2);
        let first = pool.acquire().await.unwrap();
        let second = pool.acquire().await.unwrap();
        assert_eq!(pool.in_flight(), 2);
        assert_eq!(pool.available(), 0);

        drop(first);
        assert_eq!(pool.in_flight(), 1);
        drop(second);
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(pool.peak_in_flight(), 2);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(WritePool::new(0).capacity(), 1);
    }

    #[tokio::test]
    async fn test_waits_for_free_slot() {
        let pool = Arc::new(WritePool::new(1));
        let held = pool.acquire().await.unwrap();

        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                let _permit = pool.acquire().await;
                pool.peak_in_flight()
            })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(held);
        assert_eq!(waiter.await.unwrap(), 1);
    }
}
