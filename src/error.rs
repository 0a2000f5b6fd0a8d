//! HTTP-facing error type.
//!
//! Every failure leaving a handler is an [`AppError`], rendered as
//!
//! ```json
//! { "error": { "code": "not_found", "message": "...", "details": { ... } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use crate::application::services::LinkError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Gone { message: String, details: Value },
    TooManyRequests { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(message: impl Into<String>, details: Value) -> Self {
        Self::TooManyRequests {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Gone { message, details } => (StatusCode::GONE, "gone", message, details),
            AppError::TooManyRequests { message, details } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    /// Converts into the serializable payload used in response bodies.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (_, code, message, _) = self.parts();
        write!(f, "{}: {}", code, message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("ApiKey header=\"X-API-Key\""),
            );
        }
        response
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::NotFound { code } => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            LinkError::Gone { code, reason } => AppError::gone(
                "Short link is no longer available",
                json!({ "code": code, "reason": reason.as_str() }),
            ),
            LinkError::ExhaustedRetries { attempts } => {
                tracing::error!(attempts, "Short code space exhausted");
                AppError::internal(
                    "Failed to generate unique code",
                    json!({ "reason": "Too many collisions" }),
                )
            }
            LinkError::Store {
                operation,
                code,
                source,
            } => {
                tracing::error!(operation, code = ?code, error = %source, "Store operation failed");
                AppError::internal("Database error", json!({}))
            }
            e @ (LinkError::InvalidLength(_) | LinkError::Entropy(_)) => {
                tracing::error!(error = %e, "Code generation failed");
                AppError::internal("Failed to generate code", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GoneReason;

    #[test]
    fn test_link_errors_map_to_statuses() {
        let not_found: AppError = LinkError::NotFound {
            code: "abc".to_string(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let gone: AppError = LinkError::Gone {
            code: "abc".to_string(),
            reason: GoneReason::Expired,
        }
        .into();
        assert_eq!(gone.status(), StatusCode::GONE);
        assert_eq!(gone.to_error_info().details["reason"], "expired");

        let exhausted: AppError = LinkError::ExhaustedRetries { attempts: 10 }.into();
        assert_eq!(exhausted.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let err = AppError::too_many_requests("Slow down", json!({}));
        assert_eq!(err.to_string(), "rate_limited: Slow down");
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
