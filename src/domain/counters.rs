//! Counter sink for process-wide link activity.

/// Receives fire-and-forget activity increments.
///
/// Implementations must not block or fail; the operation that triggered the
/// increment has already succeeded.
pub trait CounterSink: Send + Sync {
    /// A new link was persisted.
    fn link_created(&self);

    /// A redirect was served and its hit recorded.
    fn redirect_served(&self);
}

/// Sink that discards every increment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCounters;

impl CounterSink for NoopCounters {
    fn link_created(&self) {}

    fn redirect_served(&self) {}
}
