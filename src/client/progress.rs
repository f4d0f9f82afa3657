//! Navigation progress indicator.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives start/finish events around every visit.
pub trait Progress: Send + Sync {
    fn start(&self, url: &str);
    fn finish(&self, url: &str);
}

/// Logs visits through `tracing`.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn start(&self, url: &str) {
        tracing::debug!(url, "Navigation started");
    }

    fn finish(&self, url: &str) {
        tracing::debug!(url, "Navigation finished");
    }
}

/// Counts visits in flight; useful for spinners and tests.
#[derive(Debug, Default)]
pub struct ActiveVisits {
    active: AtomicUsize,
    started: AtomicUsize,
}

impl ActiveVisits {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl Progress for ActiveVisits {
    fn start(&self, _url: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self, _url: &str) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
