//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lifecycle updates

pub mod link_repository;

pub use link_repository::{LinkRepository, RepositoryError};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
