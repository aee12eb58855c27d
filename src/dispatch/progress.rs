//! Run-scoped progress counter
//!
//! Shared by every worker in a run. It is only read for the operator's
//! progress line and never influences which URLs get probed.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts completed probes for one batch
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
    log_every: usize,
}

impl ProgressCounter {
    /// Creates a counter at zero for a batch of `total` URLs
    ///
    /// A progress line is logged every `log_every` completions and on the
    /// last one. Zero is treated as one.
    pub fn new(total: usize, log_every: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            log_every: log_every.max(1),
        }
    }

    /// Records one finished probe and returns the new count
    pub fn record(&self) -> usize {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::trace!("{} URL's checked", done);
        if done % self.log_every == 0 || done == self.total {
            tracing::info!(
                "Progress: {}/{} URLs checked ({:.1}%)",
                done,
                self.total,
                self.percent()
            );
        }

        done
    }

    /// Number of probes completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Size of the batch being counted
    pub fn total(&self) -> usize {
        self.total
    }

    /// Completed share of the batch in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed() as f64 / self.total as f64) * 100.0
    }
}
