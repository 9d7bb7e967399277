//! Supersession of in-flight refreshes.
//!
//! Every filter change starts a new refresh. Results computed for an older
//! selection must never be shown once a newer one exists.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::DashboardError;

/// Hands out generation numbers for one viewer's refreshes.
#[derive(Debug, Clone, Default)]
pub struct RefreshTracker {
    latest: Arc<AtomicU64>,
}

impl RefreshTracker {
    /// Creates a tracker with no refresh started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh, superseding every earlier ticket.
    #[must_use]
    pub fn begin(&self) -> RefreshTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RefreshTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Proof of which refresh a result belongs to.
#[derive(Debug, Clone)]
pub struct RefreshTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RefreshTicket {
    /// This refresh's generation number.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true while no newer refresh has started.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }

    /// Fails with [`DashboardError::Superseded`] once a newer refresh started.
    pub fn ensure_current(&self) -> Result<(), DashboardError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(DashboardError::Superseded)
        }
    }
}
