//! Database migration command.
//!
//! Applies the embedded schema migrations and creates the session table.
//! Safe to run repeatedly.

use pantry_web::{db, middleware};

use super::{CommandError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running catalog migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Creating session table...");
    middleware::migrate_session_store(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
