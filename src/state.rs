//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RateLimiterRegistry};
use crate::infrastructure::persistence::SqliteLinkRepository;
use crate::infrastructure::telemetry::Telemetry;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub auth_service: Arc<AuthService>,
    pub rate_limiter: Arc<RateLimiterRegistry>,
    pub telemetry: Arc<Telemetry>,
    /// Public base URL used to build `short_url` in responses.
    pub base_url: Option<String>,
    /// Read the client identity from proxy headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Builds the full short URL for `code`, if a base URL is configured.
    pub fn short_url(&self, code: &str) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), code))
    }
}
