//! # snaplink
//!
//! A small URL shortening service built with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entity, clock, counters and repository traits
//! - **Application Layer** ([`application`]) - Link lifecycle, authentication and rate limiting
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence and telemetry
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random alphanumeric short codes with collision retry
//! - Optional link expiry and explicit revocation
//! - Hit counting on every redirect
//! - API key authentication for mutating endpoints
//! - Per-client token bucket rate limiting
//!
//! ## Quick Start
//!
//! ```bash
//! export API_KEYS="change-me"
//! export DB_PATH="data/snaplink.db"
//!
//! cargo run
//! ```
//!
//! Migrations are embedded and applied on startup.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AuthService, LinkError, LinkService, RateLimiterConfig, RateLimiterRegistry,
    };
    pub use crate::domain::clock::{Clock, ManualClock, SystemClock};
    pub use crate::domain::entities::{GoneReason, Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
