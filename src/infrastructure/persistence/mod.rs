//! SQLite persistence.
//!
//! - [`SqliteLinkRepository`] - Link storage and lifecycle updates
//! - [`connect`] - Pool construction and schema migration

pub mod sqlite_link_repository;

pub use sqlite_link_repository::SqliteLinkRepository;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Opens a connection pool and applies the embedded migrations.
///
/// The database file is created when it does not exist yet.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the database cannot be opened,
/// or a migration fails.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(pool)
}

/// Applies the embedded migrations from `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
