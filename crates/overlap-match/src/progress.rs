//! Observation hooks for long matching runs.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives progress as source records are processed.
///
/// Observers never influence matching; every method defaults to a no-op.
pub trait ProgressObserver {
    fn start(&self, _total: usize) {}

    /// Called once per source record with the count processed so far.
    fn advance(&self, _processed: usize) {}

    fn finish(&self) {}
}

impl ProgressObserver for () {}

/// Thread-safe counter of processed records.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    total: AtomicUsize,
    processed: AtomicUsize,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for ProgressCounter {
    fn start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
    }

    fn advance(&self, processed: usize) {
        // Never move backwards.
        self.processed.fetch_max(processed, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic() {
        let counter = ProgressCounter::new();
        counter.start(3);
        counter.advance(2);
        counter.advance(1);
        assert_eq!(counter.processed(), 2);
        assert_eq!(counter.total(), 3);
    }
}
