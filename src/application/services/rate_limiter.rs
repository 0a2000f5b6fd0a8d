//! Per-client token bucket rate limiting.
//!
//! The registry keeps one bucket per client identity. Buckets are created on
//! first use under a single registry lock, so concurrent first requests from
//! the same identity always share one bucket. Token accounting afterwards only
//! locks the identity's own bucket.
//!
//! State is process-local. Instances behind a load balancer each keep their
//! own view.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::domain::clock::Clock;

/// Token bucket parameters shared by every identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// Maximum number of tokens a bucket holds; also the burst size.
    pub capacity: u32,
    /// Tokens added per second of elapsed time.
    pub refill_per_second: f64,
    /// Upper bound on tracked identities. `None` tracks every identity for
    /// the lifetime of the process.
    pub max_identities: Option<usize>,
}

impl RateLimiterConfig {
    /// Allows `rps` requests per second with a burst of `rps`.
    pub fn per_second(rps: u32) -> Self {
        Self {
            capacity: rps,
            refill_per_second: f64::from(rps),
            max_identities: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_identities(mut self, max_identities: Option<usize>) -> Self {
        self.max_identities = max_identities;
        self
    }
}

#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    refill_per_second: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(config: &RateLimiterConfig, now: Instant) -> Self {
        Self {
            capacity: f64::from(config.capacity),
            refill_per_second: config.refill_per_second,
            tokens: f64::from(config.capacity),
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_second).min(self.capacity);
        self.last_refill = now;
    }

    /// Refills, then takes one token if available.
    fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

type SharedBucket = Arc<Mutex<TokenBucket>>;

/// Registry of per-identity token buckets.
pub struct RateLimiterRegistry {
    config: RateLimiterConfig,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<String, SharedBucket>>,
}

impl RateLimiterRegistry {
    pub fn new(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Decides whether a request from `identity` may proceed.
    ///
    /// Never fails. The first call for an identity starts it with a full
    /// bucket. A refused request leaves the bucket's tokens unchanged.
    pub fn admit(&self, identity: &str) -> bool {
        let bucket = self.bucket_for(identity);
        // Read the clock under the bucket lock so refills stay ordered.
        let allowed = {
            let mut bucket = bucket.lock();
            bucket.try_acquire(self.clock.instant())
        };

        if !allowed {
            debug!(identity, "Rate limit exceeded");
        }
        allowed
    }

    /// Number of identities currently tracked.
    pub fn tracked_identities(&self) -> usize {
        self.buckets.lock().len()
    }

    /// Returns the identity's bucket, creating it if absent.
    ///
    /// The registry lock covers the whole lookup-or-insert and is released
    /// before any token accounting.
    fn bucket_for(&self, identity: &str) -> SharedBucket {
        let mut buckets = self.buckets.lock();

        if let Some(bucket) = buckets.get(identity) {
            return Arc::clone(bucket);
        }

        if let Some(max) = self.config.max_identities
            && buckets.len() >= max
        {
            evict_least_recently_used(&mut buckets);
        }

        let bucket = Arc::new(Mutex::new(TokenBucket::full(
            &self.config,
            self.clock.instant(),
        )));
        buckets.insert(identity.to_owned(), Arc::clone(&bucket));
        debug!(identity, tracked = buckets.len(), "Created rate limit bucket");

        bucket
    }
}

/// Drops the bucket whose last refill is oldest.
fn evict_least_recently_used(buckets: &mut HashMap<String, SharedBucket>) {
    let oldest = buckets
        .iter()
        .min_by_key(|(_, bucket)| bucket.lock().last_refill)
        .map(|(identity, _)| identity.clone());

    if let Some(identity) = oldest {
        buckets.remove(&identity);
        debug!(identity = %identity, "Evicted idle rate limit bucket");
    }
}
