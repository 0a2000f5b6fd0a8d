//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - SQLite repository implementation and migrations
//! - [`telemetry`] - Atomic activity counters

pub mod persistence;
pub mod telemetry;
