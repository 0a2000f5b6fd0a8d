#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use snaplink::config::Config;
use snaplink::domain::clock::{Clock, ManualClock, SystemClock};
use snaplink::routes::router;
use snaplink::server::build_state;
use snaplink::state::AppState;

pub const TEST_API_KEY: &str = "test-api-key";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: Some("https://s.example.com".to_string()),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        api_keys: vec![TEST_API_KEY.to_string()],
        rate_limit: 1000,
        rate_limit_burst: None,
        rate_limit_max_identities: None,
        behind_proxy: false,
        code_length: 8,
        db_max_connections: 1,
    }
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    build_state(pool, &test_config(), Arc::new(SystemClock))
}

pub fn create_test_state_with_clock(pool: SqlitePool, clock: Arc<ManualClock>) -> AppState {
    let clock: Arc<dyn Clock> = clock;
    build_state(pool, &test_config(), clock)
}

pub fn create_test_state_with_config(pool: SqlitePool, config: &Config) -> AppState {
    build_state(pool, config, Arc::new(SystemClock))
}

/// Application routes with rate limiting and auth included.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    insert_link(pool, code, url, None, false).await;
}

pub async fn create_expired_link(pool: &SqlitePool, code: &str, url: &str) {
    let expired = Utc::now() - chrono::Duration::hours(1);
    insert_link(pool, code, url, Some(expired), false).await;
}

pub async fn create_revoked_link(pool: &SqlitePool, code: &str, url: &str) {
    insert_link(pool, code, url, None, true).await;
}

pub async fn insert_link(
    pool: &SqlitePool,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
    revoked: bool,
) {
    sqlx::query(
        "INSERT INTO links (code, target_url, created_at, expires_at, revoked) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(code)
    .bind(url)
    .bind(Utc::now())
    .bind(expires_at)
    .bind(revoked)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn hit_count(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT hit_count FROM links WHERE code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
