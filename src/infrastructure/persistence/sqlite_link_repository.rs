//! SQLite implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, RepositoryError};

/// SQLite repository for link storage.
///
/// Every lifecycle mutation is a single statement, so concurrent requests
/// never race on a read-modify-write in the application.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, target_url, created_at, hit_count, expires_at, revoked)
            VALUES (?1, ?2, ?3, 0, ?4, 0)
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .execute(self.pool.as_ref())
        .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if is_unique_violation(&e) => {
                return Err(RepositoryError::DuplicateCode {
                    code: new_link.code,
                });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Link {
            id: result.last_insert_rowid(),
            code: new_link.code,
            target_url: new_link.target_url,
            created_at: new_link.created_at,
            hit_count: 0,
            expires_at: new_link.expires_at,
            revoked: false,
        })
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, RepositoryError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, target_url, created_at, hit_count, expires_at, revoked
            FROM links
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_hits(&self, code: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE links SET hit_count = hit_count + 1 WHERE code = ?1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn set_revoked(&self, code: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE links SET revoked = 1 WHERE code = ?1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_active(&self, now: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM links
            WHERE revoked = 0
              AND (expires_at IS NULL OR expires_at > ?1)
            "#,
        )
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
