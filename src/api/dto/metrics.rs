//! DTO for the metrics endpoint.

use serde::Serialize;

/// Service counters plus the current number of resolvable links.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub links_created: u64,
    pub redirects_served: u64,
    pub active_links: i64,
}
