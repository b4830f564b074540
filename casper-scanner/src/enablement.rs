//! Process-wide on/off switch for autonomous scanning.
//!
//! The switch starts enabled. The fetcher and the traversal driver poll it
//! before every network action, so flipping it mid-scan stops any fetch that
//! has not started yet while leaving in-flight requests alone.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Anything that can answer "may the scanner touch the network right now?".
pub trait EnablementSource: Send + Sync {
    fn is_enabled(&self) -> bool;
}

impl<T: EnablementSource + ?Sized> EnablementSource for Arc<T> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

/// Shared scan-enablement flag. Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct ScanSwitch {
    active: Arc<AtomicBool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnablementStatus {
    pub active: bool,
    pub status: String,
}

impl ScanSwitch {
    pub fn new() -> Self {
        Self::with_state(true)
    }

    pub fn with_state(active: bool) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(active)),
        }
    }

    pub fn enable(&self) {
        self.active.store(true, Ordering::SeqCst);
        info!("Autonomous mode enabled");
    }

    pub fn disable(&self) {
        self.active.store(false, Ordering::SeqCst);
        info!("Autonomous mode disabled");
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&self) -> bool {
        let now_active = !self.active.fetch_xor(true, Ordering::SeqCst);
        info!(
            "Autonomous mode {}",
            if now_active { "enabled" } else { "disabled" }
        );
        now_active
    }

    pub fn status(&self) -> EnablementStatus {
        let active = self.is_enabled();
        EnablementStatus {
            active,
            status: if active { "Active" } else { "Inactive" }.to_string(),
        }
    }
}

impl Default for ScanSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl EnablementSource for ScanSwitch {
    fn is_enabled(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
