//! Database access layer for haiku-store

use haiku_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

pub mod haikus;

/// Connection tuning for the store database
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 8,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Open (creating if needed) the store database and its tables
pub async fn init_database_pool(db_path: &Path, settings: PoolSettings) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!("Connecting to database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .connect_with(options)
        .await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the haikus table if it doesn't exist.
///
/// AUTOINCREMENT keeps SQLite from handing out the id of a deleted row
/// again.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS haikus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            line1 TEXT NOT NULL,
            line2 TEXT NOT NULL,
            line3 TEXT NOT NULL,
            syllables1 INTEGER NOT NULL,
            syllables2 INTEGER NOT NULL,
            syllables3 INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_haikus_created_at ON haikus (created_at, id)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (haikus)");

    Ok(())
}
