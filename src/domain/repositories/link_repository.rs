//! Repository trait for link persistence.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Errors reported by link storage.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The insert was rejected by the unique constraint on `code`.
    #[error("Short code '{code}' is already taken")]
    DuplicateCode { code: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence interface for links.
///
/// The store owns code uniqueness: [`LinkRepository::insert`] must fail with
/// [`RepositoryError::DuplicateCode`] when another row already holds the code,
/// even if an earlier lookup saw it free.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zero hits and `revoked = false`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateCode`] if the code already exists.
    /// Returns [`RepositoryError::Database`] on other database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, RepositoryError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, RepositoryError>;

    /// Adds one to `hit_count` in a single update statement.
    ///
    /// Returns the number of rows affected (0 or 1).
    async fn increment_hits(&self, code: &str) -> Result<u64, RepositoryError>;

    /// Sets `revoked = true`.
    ///
    /// Returns the number of rows matched, which stays 1 for an already
    /// revoked link.
    async fn set_revoked(&self, code: &str) -> Result<u64, RepositoryError>;

    /// Counts links that are neither revoked nor expired at `now`.
    async fn count_active(&self, now: DateTime<Utc>) -> Result<i64, RepositoryError>;

    /// Counts every stored link.
    async fn count_all(&self) -> Result<i64, RepositoryError>;

    /// Runs a trivial query to confirm the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
