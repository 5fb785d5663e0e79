//! Optional shared counters updated by the feeder callback.
//!
//! All counters are relaxed-ordering atomics owned via `Arc`, so control-side
//! code (status endpoints, exit summaries) can observe progress without any
//! synchronization on the real-time path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters a host may wire into the engine. All fields optional.
#[derive(Clone, Debug, Default)]
pub struct FeederCounters {
    /// Total underflow callbacks serviced.
    pub callbacks: Option<Arc<AtomicU64>>,
    /// Samples emitted while a source was active.
    pub played_samples: Option<Arc<AtomicU64>>,
    /// Samples emitted as silence.
    pub silent_samples: Option<Arc<AtomicU64>>,
}

impl FeederCounters {
    /// Record one serviced callback that emitted `count` samples.
    pub(crate) fn record(&self, count: usize, active: bool) {
        if let Some(c) = &self.callbacks {
            c.fetch_add(1, Ordering::Relaxed);
        }
        let target = if active {
            &self.played_samples
        } else {
            &self.silent_samples
        };
        if let Some(c) = target {
            c.fetch_add(count as u64, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_played_and_silent() {
        let counters = FeederCounters {
            callbacks: Some(Arc::new(AtomicU64::new(0))),
            played_samples: Some(Arc::new(AtomicU64::new(0))),
            silent_samples: Some(Arc::new(AtomicU64::new(0))),
        };

        counters.record(128, true);
        counters.record(128, false);
        counters.record(64, false);

        assert_eq!(counters.callbacks.as_ref().unwrap().load(Ordering::Relaxed), 3);
        assert_eq!(
            counters.played_samples.as_ref().unwrap().load(Ordering::Relaxed),
            128
        );
        assert_eq!(
            counters.silent_samples.as_ref().unwrap().load(Ordering::Relaxed),
            192
        );
    }

    #[test]
    fn record_with_no_counters_is_a_noop() {
        FeederCounters::default().record(128, true);
    }
}
