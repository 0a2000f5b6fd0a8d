//! Per-client rate limiting middleware.
//!
//! Every request is charged one token from the caller's bucket in
//! [`RateLimiterRegistry`](crate::application::services::RateLimiterRegistry).
//! Requests arriving at an empty bucket receive `429 Too Many Requests`.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// Identity used when no client address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Admits or rejects the request based on the client's token bucket.
///
/// # Key Extraction
///
/// The client identity is the socket peer IP. With `behind_proxy` enabled it
/// is taken from `X-Forwarded-For` (first entry) or `X-Real-IP` instead.
/// Clients without any identifiable address share one bucket.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(req.headers(), peer, st.behind_proxy);

    if !st.rate_limiter.admit(&identity) {
        debug!(client = %identity, path = %req.uri().path(), "Rate limit exceeded");
        return Err(AppError::too_many_requests(
            "Too many requests",
            serde_json::json!({
                "limit_per_second": st.rate_limiter.config().refill_per_second,
                "burst": st.rate_limiter.config().capacity,
            }),
        ));
    }

    Ok(next.run(req).await)
}

/// Resolves the rate limiting identity for a request.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip;
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded_for.or_else(real_ip).map(str::to_string)
}
