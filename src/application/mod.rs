//! Application layer services implementing business logic.
//!
//! Services consume the domain traits and expose plain async calls to the
//! HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution, hits and revocation
//! - [`services::rate_limiter::RateLimiterRegistry`] - Per-client token buckets
//! - [`services::auth_service::AuthService`] - API key authentication

pub mod services;
