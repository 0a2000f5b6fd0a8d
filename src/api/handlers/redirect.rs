//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (rejects unknown, revoked and expired links)
/// 2. Record the hit
/// 3. Return 307 Temporary Redirect
///
/// A failed hit update is logged and otherwise ignored; the redirect is
/// still served.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
/// Returns 410 Gone if the link was revoked or has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let link = state.link_service.resolve_link(&code).await?;

    if let Err(e) = state.link_service.increment_hits(&code).await {
        warn!(code = %code, error = %e, "Failed to record hit");
    }

    Ok(Redirect::temporary(&link.target_url))
}
