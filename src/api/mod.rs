//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into link lifecycle operations and
//! formats responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;
