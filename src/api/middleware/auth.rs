//! API key authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticates requests using the `X-API-Key` header.
///
/// # Header Format
///
/// ```text
/// X-API-Key: <key>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - the header is missing or not valid UTF-8
/// - the key does not match any configured key
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::post, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "X-API-Key header is missing or invalid"}),
            )
        })?;

    st.auth_service.authenticate(api_key)?;

    Ok(next.run(req).await)
}
