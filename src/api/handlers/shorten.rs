//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /shorten` (requires `X-API-Key`)
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "expiry": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortcode": "aZ3kP9qx",
///   "created_at": "2025-01-01T12:00:00Z",
///   "expires_at": "2030-01-01T00:00:00Z",
///   "short_url": "https://s.example.com/aZ3kP9qx"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is empty or malformed.
/// Returns 500 Internal Server Error if no free code could be found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(mut payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.url = payload.url.trim().to_string();
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.expiry)
        .await?;

    info!(code = %link.code, expires_at = ?link.expires_at, "Short link created");

    let short_url = state.short_url(&link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            shortcode: link.code,
            created_at: link.created_at,
            expires_at: link.expires_at,
            short_url,
        }),
    ))
}
