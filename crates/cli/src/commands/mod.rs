//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use sqlx::SqlitePool;
use thiserror::Error;

use pantry_web::config::{ConfigError, WebConfig};
use pantry_web::db;
use pantry_web::services::{AuthError, SeedError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("seed error: {0}")]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Load configuration and open the database.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url).await?)
}
