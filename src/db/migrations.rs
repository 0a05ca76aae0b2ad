//! Database migrations
//!
//! Migrations are handled by SQLx and stored in the `migrations/` directory.
//! This module provides utilities for working with migrations programmatically.

use anyhow::Result;
use sqlx::SqlitePool;

/// Check that the migrated schema contains the tables this crate relies on
pub async fn check_migrations(pool: &SqlitePool) -> Result<bool> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM sqlite_master
        WHERE type = 'table' AND name IN ('statup_request', 'startup_message')
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(row.0 == 2)
}
