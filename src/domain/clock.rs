//! Time sources for expiry checks and token bucket refill.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Source of wall-clock and monotonic time.
///
/// Link expiry is compared against [`Clock::now`]; token buckets measure
/// elapsed time with [`Clock::instant`] so wall-clock adjustments never mint
/// or destroy tokens.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Current monotonic instant.
    fn instant(&self) -> Instant;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Both readings advance together through [`ManualClock::advance`].
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<(DateTime<Utc>, Instant)>,
}

impl ManualClock {
    /// Creates a clock frozen at the current system time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Creates a clock frozen at `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new((now, Instant::now())),
        }
    }

    /// Moves both the wall clock and the monotonic clock forward.
    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock();
        inner.0 += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        inner.1 += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.lock().0
    }

    fn instant(&self) -> Instant {
        self.inner.lock().1
    }
}
