//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL (must be a valid absolute URL).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional expiry timestamp (RFC 3339). After this time, the link returns 410 Gone.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub shortcode: String,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Full short URL; present only when `BASE_URL` is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}
