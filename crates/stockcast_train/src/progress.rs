//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable token for requesting cancellation of a running training job.
///
/// The trainer polls the token at epoch boundaries; cancelling mid-epoch
/// takes effect once the current epoch finishes. Cancellation is one-way:
/// a cancelled token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, non-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Receiver for coarse training progress, in whole percent.
///
/// The trainer reports `floor((epoch + 1) * 100 / n_epochs)` after each
/// completed epoch, so values are monotonically non-decreasing within a
/// run and reach 100 only when every epoch ran.
pub trait ProgressSink {
    /// Record a progress value in `0..=100`.
    fn report(&mut self, percent: u8);
}

/// A sink that discards all progress reports.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _percent: u8) {}
}

/// A sink that collects every reported value, mainly for tests.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// All reported values, in order.
    pub values: Vec<u8>,
}

impl ProgressSink for CollectSink {
    fn report(&mut self, percent: u8) {
        self.values.push(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_collect_sink() {
        let mut sink = CollectSink::default();
        sink.report(2);
        sink.report(4);
        assert_eq!(sink.values, vec![2, 4]);
    }
}
