//! Database layer
//!
//! This module handles database operations for local storage of:
//! - Service requests raised by users
//! - Contact messages attached to requests

pub mod message_repository;
pub mod migrations;
pub mod request_repository;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    ensure_data_directory(config)?;

    // SQLite only honors ON DELETE actions while foreign_keys is enabled
    // on the connection, so it is switched on for every pool member.
    let options = SqliteConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Database pool ready at {}", config.url);

    Ok(pool)
}

/// Ensure the directory holding the SQLite file exists
fn ensure_data_directory(config: &DatabaseConfig) -> Result<()> {
    if let Some(path) = config.url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).context("Failed to create data directory")?;
                info!("Created data directory: {:?}", parent);
            }
        }
    }
    Ok(())
}
