//! CLI administration tool for snaplink.
//!
//! Inspects and revokes links, shows statistics and checks the database
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show a link and its state
//! cargo run --bin admin -- inspect aZ3kP9qx
//!
//! # Revoke a link (asks for confirmation unless --yes)
//! cargo run --bin admin -- revoke aZ3kP9qx
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Generate a value for API_KEYS
//! cargo run --bin admin -- key generate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_PATH`: same resolution as the server

use snaplink::application::services::{LinkError, LinkService};
use snaplink::config::Config;
use snaplink::domain::clock::{Clock, SystemClock};
use snaplink::domain::counters::NoopCounters;
use snaplink::domain::entities::Link;
use snaplink::infrastructure::persistence::{self, SqliteLinkRepository};
use snaplink::utils::code_generator::generate_code;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::sync::Arc;

const API_KEY_LEN: usize = 48;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show a link and its current state
    Inspect {
        /// Short code
        code: String,
    },

    /// Revoke a link
    Revoke {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// API key helpers
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// API key subcommands.
#[derive(Subcommand)]
enum KeyAction {
    /// Generate a random API key
    Generate,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type Service = LinkService<SqliteLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Key { action } = &cli.command {
        return handle_key_action(action);
    }

    let database_url = Config::load_database_url();
    let pool = persistence::connect(&database_url, 1)
        .await
        .context("Failed to connect to database")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = LinkService::new(
        Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone()))),
        clock.clone(),
        Arc::new(NoopCounters),
    );

    match cli.command {
        Commands::Inspect { code } => inspect_link(&service, clock.as_ref(), &code).await?,
        Commands::Revoke { code, yes } => revoke_link(&service, &code, yes).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &service, &pool).await?,
        Commands::Key { .. } => {}
    }

    Ok(())
}

/// Prints every stored field of a link plus whether it resolves right now.
async fn inspect_link(service: &Service, clock: &dyn Clock, code: &str) -> Result<()> {
    let Some(link) = find(service, code).await? else {
        return Ok(());
    };

    println!("{}", "🔎 Link".bright_blue().bold());
    println!();
    println!("  Code:     {}", link.code.cyan());
    println!("  Target:   {}", link.target_url.bright_white());
    println!(
        "  Created:  {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    match link.expires_at {
        Some(at) => println!(
            "  Expires:  {}",
            at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
        ),
        None => println!("  Expires:  {}", "never".bright_black()),
    }
    println!("  Hits:     {}", link.hit_count.to_string().bright_green());

    let status = match link.check_resolvable_at(clock.now()) {
        Ok(()) => "ACTIVE".green(),
        Err(reason) => reason.as_str().to_uppercase().red(),
    };
    println!("  Status:   {}", status);
    println!();

    Ok(())
}

/// Revokes a link after an optional confirmation prompt.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - Reports already revoked links without touching them
async fn revoke_link(service: &Service, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Revoke Link".bright_blue().bold());
    println!();

    let Some(link) = find(service, code).await? else {
        return Ok(());
    };

    if link.revoked {
        println!("{}", "⚠️  This link is already revoked".yellow());
        return Ok(());
    }

    println!("  Code:   {}", link.code.cyan());
    println!("  Target: {}", link.target_url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .revoke_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke link: {}", e))?;

    println!();
    println!("{}", "✅ Link revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays link counts.
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = service
        .total_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let active = service
        .active_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count active links: {}", e))?;

    println!("  Links:        {}", total.to_string().bright_green().bold());
    println!("  Active links: {}", active.to_string().bright_green().bold());
    println!(
        "  Inactive:     {}",
        (total - active).to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Prints a freshly generated API key.
fn handle_key_action(action: &KeyAction) -> Result<()> {
    match action {
        KeyAction::Generate => {
            let key = generate_code(API_KEY_LEN).context("Failed to generate key")?;

            println!("{}", "🔑 API Key".bright_blue().bold());
            println!();
            println!("  {}", key.bright_yellow().bold());
            println!();
            println!("{}", "Add it to API_KEYS and send it as:".bright_white());
            println!("  {}: {}", "X-API-Key".bright_cyan(), key.bright_yellow());
            println!();
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, service: &Service, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            service
                .health_check()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("  SQLite: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Fetches a link, printing a notice instead of failing when it is missing.
async fn find(service: &Service, code: &str) -> Result<Option<Link>> {
    match service.find_link(code).await {
        Ok(link) => Ok(Some(link)),
        Err(LinkError::NotFound { .. }) => {
            println!("{}", format!("❌ No link with code '{}'", code).red());
            Ok(None)
        }
        Err(e) => Err(anyhow::anyhow!("Database error: {}", e)),
    }
}
