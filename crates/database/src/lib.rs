//! SQLite persistence layer for lead qualification conversations.
//!
//! This crate stores organization question catalogs, lead conversations with
//! their append-only answer log, and follow-up reminders using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, Database};
//! use lead_core::{default_catalog, Wizard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:leads.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record a call
//!     let mut wizard = Wizard::new(default_catalog());
//!     wizard.select(1, "call_continued")?;
//!     wizard.set_rating(4)?;
//!     conversation::submit_conversation(db.pool(), &wizard.submission("lead-1")?).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod follow_up;
pub mod models;
pub mod question_set;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use lead_core::QuestionSet;
pub use models::FollowUp;
pub use validation::ValidationError;

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
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/leads.db?mode=rwc").await?;
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
            .foreign_keys(true);

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

    /// In-memory database with migrations applied.
    ///
    /// Every SQLite connection to `:memory:` opens its own database, so the
    /// pool holds exactly one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
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
    use lead_core::{default_catalog, Wizard};

    #[tokio::test]
    async fn test_conversation_roundtrip() {
        let db = Database::in_memory().await.unwrap();

        let mut wizard = Wizard::new(default_catalog());
        wizard.start();
        wizard.select(1, "call_continued").unwrap();
        wizard.select(2, "guardian").unwrap();
        wizard.set_rating(3).unwrap();
        let submission = wizard.submission("lead-42").unwrap();

        conversation::submit_conversation(db.pool(), &submission)
            .await
            .unwrap();

        let stored = conversation::get_conversation(db.pool(), "lead-42")
            .await
            .unwrap();
        assert_eq!(stored.questions, submission.questions);
        assert_eq!(stored.overall_answer_score, 2);
        assert_eq!(stored.status, "open");

        // Resuming yields the same answers.
        let resumed = Wizard::resume(default_catalog(), &stored);
        assert_eq!(resumed.answers(), wizard.answers());
        assert_eq!(resumed.rating(), 3);

        let missing = conversation::get_conversation(db.pool(), "lead-0").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }
}
