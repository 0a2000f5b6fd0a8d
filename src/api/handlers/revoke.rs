//! Handler for link revocation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Revokes a short link so it no longer redirects.
///
/// # Endpoint
///
/// `DELETE /{code}` (requires `X-API-Key`)
///
/// Revoking an already revoked link succeeds again.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn revoke_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.revoke_link(&code).await?;

    info!(code = %code, "Short link revoked");

    Ok(StatusCode::NO_CONTENT)
}
