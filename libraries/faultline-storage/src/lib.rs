//! Faultline Storage
//!
//! `SQLite` persistence layer for the Faultline issue tracker.
//!
//! Each feature owns its own queries (vertical slicing): `users` holds the
//! credential store, `issues` holds the issue store together with the list
//! query engine (search + filters + offset pagination) and the per-status
//! aggregation.
//!
//! # Example
//!
//! ```rust,no_run
//! use faultline_storage::{create_pool, run_migrations, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://faultline.db").await?;
//! run_migrations(&pool).await?;
//! let db = Database::new(pool);
//!
//! let users = faultline_storage::users::list(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

mod db;
mod error;

// Vertical slices
pub mod issues;
pub mod users;

pub use db::Database;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into the binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations.
///
/// Called once at startup to bring the schema up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://faultline.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true) // Create database file if it doesn't exist
        .journal_mode(SqliteJournalMode::Wal) // WAL mode for better concurrency
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
