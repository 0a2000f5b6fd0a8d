//! Domain layer containing business entities and the contracts the core consumes.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Wall-clock and monotonic time sources
//! - [`counters`] - Fire-and-forget activity counter sink
//!
//! The domain layer has no dependencies on the HTTP layer. Infrastructure
//! implements the traits defined here.

pub mod clock;
pub mod counters;
pub mod entities;
pub mod repositories;
