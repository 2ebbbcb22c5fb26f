//! Database initialization
//!
//! Opens the SQLite pool and creates the schema if needed. Every statement is
//! idempotent so the service can start against a fresh or an existing file.

use crate::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Busy timeout applied to every connection
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await
        .map_err(|e| Error::store("failed to open database", e))?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets readers proceed while a writer holds the lock
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(|e| Error::store("failed to enable WAL", e))?;

    sqlx::query(&format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
        .execute(&pool)
        .await
        .map_err(|e| Error::store("failed to set busy timeout", e))?;

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema.
///
/// Limited to one connection that never expires, otherwise each new
/// connection would see its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| Error::store("failed to open in-memory database", e))?;

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Create the songs table
///
/// `release_date` holds `YYYY-MM-DD` text. The `*_folded` columns hold the
/// lowercased text of their source column and are what listing filters match.
pub async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (title <> ''),
            group_name TEXT NOT NULL CHECK (group_name <> ''),
            release_date TEXT NOT NULL,
            lyrics TEXT NOT NULL DEFAULT '',
            link TEXT NOT NULL DEFAULT '',
            title_folded TEXT NOT NULL DEFAULT '',
            group_folded TEXT NOT NULL DEFAULT '',
            lyrics_folded TEXT NOT NULL DEFAULT '',
            link_folded TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::store("failed to create songs table", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_title_folded ON songs(title_folded)")
        .execute(pool)
        .await
        .map_err(|e| Error::store("failed to create songs title index", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_group_folded ON songs(group_folded)")
        .execute(pool)
        .await
        .map_err(|e| Error::store("failed to create songs group index", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs(release_date)")
        .execute(pool)
        .await
        .map_err(|e| Error::store("failed to create songs release date index", e))?;

    Ok(())
}
