//! Clock seam for phase-boundary checks.
//!
//! Deadline comparisons always use the engine's own clock at execution time,
//! never a caller-supplied timestamp — callers could otherwise back-date an
//! operation across a deadline.

use std::sync::atomic::{AtomicU64, Ordering};
use verdict_types::Timestamp;

/// Source of the current time for every phase-boundary check.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually-driven clock for tests.
pub struct ManualClock {
    now_secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now_secs: AtomicU64::new(start.as_secs()),
        }
    }

    pub fn set(&self, to: Timestamp) {
        self.now_secs.store(to.as_secs(), Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.now_secs.load(Ordering::SeqCst))
    }
}
