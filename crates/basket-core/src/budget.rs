//! Compute budget shared between a caller and a running analysis
//!
//! Mining and rule generation poll the budget between candidates and stop
//! early once it is exhausted. Clones share the cancel flag, so a caller
//! that gives up waiting can stop work running on another thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wall-clock deadline plus a shared cancel flag
#[derive(Debug, Clone, Default)]
pub struct Budget {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Budget {
    /// Budget that never runs out unless cancelled
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Budget that runs out `limit` from now
    pub fn within(limit: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(limit),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop every holder of this budget at its next check
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once cancelled or past the deadline
    pub fn is_exhausted(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_never_runs_out() {
        assert!(!Budget::unlimited().is_exhausted());
    }

    #[test]
    fn test_zero_limit_is_exhausted() {
        assert!(Budget::within(Duration::ZERO).is_exhausted());
        assert!(!Budget::within(Duration::from_secs(3600)).is_exhausted());
    }

    #[test]
    fn test_cancel_reaches_clones() {
        let budget = Budget::within(Duration::from_secs(3600));
        let worker = budget.clone();
        budget.cancel();
        assert!(worker.is_exhausted());
    }
}
