//! Probe statistics tracking.
//!
//! Counts answered probes and failures per category over a whole run. The
//! scheduler is sequential, but the counters are atomic so the tracker can be
//! shared with a reporting task through an `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureKind;

/// Thread-safe run statistics.
///
/// All failure kinds are initialized to zero on creation.
pub struct ProbeStats {
    answered: AtomicUsize,
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        ProbeStats {
            answered: AtomicUsize::new(0),
            failures,
        }
    }

    /// Records a probe that was answered and logged.
    pub fn record_answer(&self) {
        self.answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment a failure counter.
    pub fn increment_failure(&self, kind: FailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in ProbeStats initialization.",
                kind
            );
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answered.load(Ordering::SeqCst)
    }

    /// Get the count for a failure kind.
    ///
    /// Returns 0 if the kind is not in the map (should never happen if properly initialized).
    pub fn failure_count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total failure count across all kinds.
    pub fn total_failures(&self) -> usize {
        FailureKind::iter().map(|k| self.failure_count(k)).sum()
    }
}
