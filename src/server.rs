//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, service wiring and the Axum server lifecycle.

use crate::application::services::{AuthService, LinkService, RateLimiterRegistry};
use crate::config::Config;
use crate::domain::clock::{Clock, SystemClock};
use crate::infrastructure::persistence::{self, SqliteLinkRepository};
use crate::infrastructure::telemetry::Telemetry;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;

/// Wires services around an open pool.
///
/// Used by [`run`] and by integration tests that bring their own pool and
/// clock.
pub fn build_state(pool: SqlitePool, config: &Config, clock: Arc<dyn Clock>) -> AppState {
    let telemetry = Arc::new(Telemetry::new());
    let link_repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));

    let link_service = LinkService::new(link_repository, clock.clone(), telemetry.clone())
        .with_code_length(config.code_length);
    let auth_service = AuthService::new(&config.api_keys);
    let rate_limiter = RateLimiterRegistry::new(config.rate_limiter_config(), clock);

    AppState {
        link_service: Arc::new(link_service),
        auth_service: Arc::new(auth_service),
        rate_limiter: Arc::new(rate_limiter),
        telemetry,
        base_url: config.base_url.clone(),
        behind_proxy: config.behind_proxy,
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Link, auth and rate limiting services
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = persistence::connect(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to open database")?;
    tracing::info!("Connected to database");

    let state = build_state(pool, &config, Arc::new(SystemClock));
    tracing::info!(
        api_keys = state.auth_service.key_count(),
        code_length = state.link_service.code_length(),
        "Services initialized"
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
