//! Counters for scanner activity, one per fetch outcome.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ScanStats {
    pub fetched: AtomicUsize,
    pub blocked: AtomicUsize,
    pub disabled: AtomicUsize,
    pub failed: AtomicUsize,
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatsSnapshot {
    pub fetched: usize,
    pub blocked: usize,
    pub disabled: usize,
    pub failed: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disabled(&self) {
        self.disabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            blocked: self.blocked.load(Ordering::Relaxed),
            disabled: self.disabled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl ScanStatsSnapshot {
    /// Fetch attempts that reached the network.
    pub fn network_attempts(&self) -> usize {
        self.fetched + self.failed
    }
}
