//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST   /shorten`  - Create a short link (API key required)
//! - `GET    /health`   - Health check: database and rate limiter (public)
//! - `GET    /metrics`  - Activity counters (public)
//! - `GET    /{code}`   - Short link redirect (public)
//! - `DELETE /{code}`   - Revoke a short link (API key required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-client token bucket on every route
//! - **Authentication** - `X-API-Key` on mutating routes
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    health_handler, metrics_handler, redirect_handler, revoke_handler, shorten_handler,
};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
///
/// Static routes (`/health`, `/metrics`, `/shorten`) take precedence over
/// the `/{code}` capture.
pub fn router(state: AppState) -> Router {
    let require_key = || middleware::from_fn_with_state(state.clone(), auth::layer);

    Router::new()
        .route("/shorten", post(shorten_handler).route_layer(require_key()))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/{code}",
            get(redirect_handler).merge(delete(revoke_handler).route_layer(require_key())),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}
