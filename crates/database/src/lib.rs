//! SQLite persistence layer for Suzi.
//!
//! This crate provides async database operations for per-conversation
//! settings, learned utterances, and the reminder queue using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{settings, Database, SettingValue, Tone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:suzi.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     settings::set_setting(db.pool(), -100123, SettingValue::Tone(Tone::Angry)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod reminder;
pub mod settings;
pub mod utterance;

pub use error::{DatabaseError, Result};
pub use models::{ChatId, ChatSettings, Language, Reminder, Tone, UserId, Utterance};
pub use settings::{SettingKey, SettingValue};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 5;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/suzi.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Open a migrated in-memory database.
    ///
    /// Uses a single connection that is never recycled, since every SQLite
    /// in-memory connection has its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_repeatable() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        assert!(!settings::is_learning_enabled(db.pool(), 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = std::env::temp_dir().join(format!("suzi-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.join("suzi.db").display());

        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();
        settings::set_learning_enabled(db.pool(), 5, true).await.unwrap();
        db.close().await;

        let db = Database::connect(&url).await.unwrap();
        assert!(settings::is_learning_enabled(db.pool(), 5).await.unwrap());
        db.close().await;

        let _ = std::fs::remove_dir_all(&dir);
    }
}
