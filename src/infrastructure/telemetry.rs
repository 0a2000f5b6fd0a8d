//! Process-wide activity counters.
//!
//! Counts start at zero when the process starts and are only ever incremented.
//! Each increment is also forwarded to the `metrics` facade so an installed
//! recorder can export it; without a recorder that forwarding is a no-op.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::counters::CounterSink;

/// Atomic counters for created links and served redirects.
#[derive(Debug, Default)]
pub struct Telemetry {
    links_created: AtomicU64,
    redirects_served: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub links_created: u64,
    pub redirects_served: u64,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads both counters without side effects.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            links_created: self.links_created.load(Ordering::Relaxed),
            redirects_served: self.redirects_served.load(Ordering::Relaxed),
        }
    }
}

impl CounterSink for Telemetry {
    fn link_created(&self) {
        self.links_created.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("links_created_total").increment(1);
    }

    fn redirect_served(&self) {
        self.redirects_served.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("redirects_served_total").increment(1);
    }
}
