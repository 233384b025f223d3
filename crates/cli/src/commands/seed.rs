//! Sample data command.

use pantry_web::{db, services};

use super::{CommandError, connect};

/// Migrate, then seed empty tables.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    db::migrate(&pool).await?;

    let report = services::seed_if_empty(&pool).await?;
    if report.users == 0 && report.products == 0 {
        tracing::info!("Tables already populated, nothing seeded");
    } else {
        tracing::info!(
            users = report.users,
            products = report.products,
            "Seeding complete"
        );
    }

    Ok(())
}
