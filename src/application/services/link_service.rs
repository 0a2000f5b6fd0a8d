//! Link lifecycle service: creation, resolution, hit counting and revocation.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::clock::Clock;
use crate::domain::counters::CounterSink;
use crate::domain::entities::{GoneReason, Link, NewLink};
use crate::domain::repositories::{LinkRepository, RepositoryError};
use crate::utils::code_generator::{CodeGenError, generate_code};

/// Maximum number of generate-probe-insert rounds in [`LinkService::create_link`].
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Code length used unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Errors produced by link lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Code length must be greater than zero, got {0}")]
    InvalidLength(usize),

    #[error("Failed to read random bytes: {0}")]
    Entropy(getrandom::Error),

    /// Every attempt collided with an existing code.
    #[error("Failed to generate a unique code after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },

    #[error("Short link '{code}' not found")]
    NotFound { code: String },

    /// The code exists but the link is revoked or expired.
    #[error("Short link '{code}' is {reason}")]
    Gone { code: String, reason: GoneReason },

    #[error("Store error during {operation}: {source}")]
    Store {
        operation: &'static str,
        code: Option<String>,
        #[source]
        source: RepositoryError,
    },
}

impl LinkError {
    fn store(operation: &'static str, code: Option<&str>, source: RepositoryError) -> Self {
        Self::Store {
            operation,
            code: code.map(str::to_owned),
            source,
        }
    }
}

impl From<CodeGenError> for LinkError {
    fn from(e: CodeGenError) -> Self {
        match e {
            CodeGenError::InvalidLength(length) => Self::InvalidLength(length),
            CodeGenError::Entropy(e) => Self::Entropy(e),
        }
    }
}

/// Service managing the lifecycle of short links.
///
/// Holds no lock across store calls. Code uniqueness is arbitrated by the
/// store's unique constraint, so several service instances may share one
/// database.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    clock: Arc<dyn Clock>,
    counters: Arc<dyn CounterSink>,
    code_length: usize,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service generating codes of [`DEFAULT_CODE_LENGTH`].
    pub fn new(
        link_repository: Arc<L>,
        clock: Arc<dyn Clock>,
        counters: Arc<dyn CounterSink>,
    ) -> Self {
        Self {
            link_repository,
            clock,
            counters,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Sets the length of generated codes.
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Creates a short link for `target_url`.
    ///
    /// Each attempt generates a code, checks the store for an existing holder
    /// and inserts. The check and the insert are separate store calls; if
    /// another writer takes the code in between, the store rejects the insert
    /// and the attempt is retried with a new code.
    ///
    /// On success the "links created" counter is incremented once.
    ///
    /// # Errors
    ///
    /// - [`LinkError::ExhaustedRetries`] after [`MAX_CODE_ATTEMPTS`] collisions
    /// - [`LinkError::InvalidLength`] if the configured code length is zero
    /// - [`LinkError::Entropy`] if the random source fails
    /// - [`LinkError::Store`] on any other store failure
    pub async fn create_link(
        &self,
        target_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, LinkError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code(self.code_length)?;

            let taken = self
                .link_repository
                .find_by_code(&code)
                .await
                .map_err(|e| LinkError::store("check code uniqueness", Some(&code), e))?
                .is_some();

            if taken {
                debug!(attempt, code = %code, "Generated code already in use");
                continue;
            }

            let new_link = NewLink {
                code,
                target_url: target_url.clone(),
                created_at: self.clock.now(),
                expires_at,
            };

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    self.counters.link_created();
                    debug!(code = %link.code, attempt, "Link created");
                    return Ok(link);
                }
                Err(RepositoryError::DuplicateCode { code }) => {
                    debug!(attempt, code = %code, "Code taken between check and insert");
                }
                Err(e) => return Err(LinkError::store("insert link", None, e)),
            }
        }

        warn!(
            attempts = MAX_CODE_ATTEMPTS,
            "Could not find a free short code"
        );

        Err(LinkError::ExhaustedRetries {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Looks up a link and checks that it can still be resolved.
    ///
    /// Read-only: the hit counter is left untouched, see
    /// [`Self::increment_hits`].
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotFound`] if no link has this code
    /// - [`LinkError::Gone`] if the link is revoked or expired
    pub async fn resolve_link(&self, code: &str) -> Result<Link, LinkError> {
        let link = self.find_link(code).await?;

        link.check_resolvable_at(self.clock.now())
            .map_err(|reason| LinkError::Gone {
                code: code.to_owned(),
                reason,
            })?;

        Ok(link)
    }

    /// Looks up a link regardless of its state.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if no link has this code.
    pub async fn find_link(&self, code: &str) -> Result<Link, LinkError> {
        self.link_repository
            .find_by_code(code)
            .await
            .map_err(|e| LinkError::store("find link", Some(code), e))?
            .ok_or_else(|| LinkError::NotFound {
                code: code.to_owned(),
            })
    }

    /// Atomically adds one to the link's hit count.
    ///
    /// Callers that already served a redirect may ignore the error; a lost
    /// hit must never undo the redirect.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if no link has this code.
    pub async fn increment_hits(&self, code: &str) -> Result<(), LinkError> {
        let rows = self
            .link_repository
            .increment_hits(code)
            .await
            .map_err(|e| LinkError::store("increment hits", Some(code), e))?;

        if rows == 0 {
            return Err(LinkError::NotFound {
                code: code.to_owned(),
            });
        }

        self.counters.redirect_served();
        Ok(())
    }

    /// Marks a link as revoked. Revoking twice is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if no link has this code.
    pub async fn revoke_link(&self, code: &str) -> Result<(), LinkError> {
        let rows = self
            .link_repository
            .set_revoked(code)
            .await
            .map_err(|e| LinkError::store("revoke link", Some(code), e))?;

        if rows == 0 {
            return Err(LinkError::NotFound {
                code: code.to_owned(),
            });
        }

        Ok(())
    }

    /// Counts links that are resolvable right now.
    pub async fn active_links(&self) -> Result<i64, LinkError> {
        self.link_repository
            .count_active(self.clock.now())
            .await
            .map_err(|e| LinkError::store("count active links", None, e))
    }

    /// Counts all stored links, including revoked and expired ones.
    pub async fn total_links(&self) -> Result<i64, LinkError> {
        self.link_repository
            .count_all()
            .await
            .map_err(|e| LinkError::store("count links", None, e))
    }

    /// Checks that the store answers queries.
    pub async fn health_check(&self) -> Result<(), LinkError> {
        self.link_repository
            .ping()
            .await
            .map_err(|e| LinkError::store("ping", None, e))
    }
}
