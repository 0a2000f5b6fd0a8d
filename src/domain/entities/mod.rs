//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping with its lifecycle state
//! - [`NewLink`] - Input for inserting a link
//! - [`GoneReason`] - Why a known link is no longer resolvable

pub mod link;

pub use link::{GoneReason, Link, NewLink};
