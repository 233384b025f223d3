//! Database operations for the catalog's SQLite store.
//!
//! # Database: single file (`pantry.db` by default)
//!
//! ## Tables
//!
//! - `users` - Login names and Argon2 password hashes
//! - `products` - Catalog records
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded at compile
//! time, and run on startup or via:
//! ```bash
//! cargo run -p pantry-cli -- migrate
//! ```

pub mod filter;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use filter::ProductFilter;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a transaction holding SQLite's write lock from the start, so a
/// read-then-write inside it cannot interleave with another writer.
pub(crate) const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if it does not exist. An in-memory URL
/// (`sqlite::memory:`) gets a single long-lived connection, since every
/// connection to `:memory:` opens a separate empty database.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if is_in_memory(url) {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

/// Apply all pending schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the recorded history
/// does not match the embedded migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
pub(crate) mod test_support {
    use secrecy::SecretString;
    use sqlx::SqlitePool;

    /// Fresh, migrated in-memory database.
    #[allow(clippy::expect_used)]
    pub async fn pool() -> SqlitePool {
        let pool = super::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .expect("in-memory pool");
        super::migrate(&pool).await.expect("migrations");
        pool
    }
}
