//! Handler for the metrics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::metrics::MetricsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns activity counters and the number of resolvable links.
///
/// # Endpoint
///
/// `GET /metrics`
///
/// # Response
///
/// ```json
/// {
///   "links_created": 42,
///   "redirects_served": 1337,
///   "active_links": 40
/// }
/// ```
///
/// Counters reset when the process restarts; `active_links` is read from the
/// database on every call.
pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, AppError> {
    let counters = state.telemetry.snapshot();
    let active_links = state.link_service.active_links().await?;

    Ok(Json(MetricsResponse {
        links_created: counters.links_created,
        redirects_served: counters.redirects_served,
        active_links,
    }))
}
