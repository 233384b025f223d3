//! User management commands.
//!
//! Unlike self-service registration, no minimum password length is enforced
//! here.

use pantry_web::services::{AuthError, AuthService};

use super::{CommandError, connect};

/// Create a new user.
///
/// # Errors
///
/// Returns `AuthError::UserAlreadyExists` (wrapped) if the username is
/// taken, and an error if the database cannot be opened.
pub async fn create(username: &str, password: &str) -> Result<(), CommandError> {
    if password.is_empty() {
        return Err(AuthError::MissingFields.into());
    }

    let pool = connect().await?;
    pantry_web::db::migrate(&pool).await?;

    let user = AuthService::new(&pool).create(username, password).await?;

    tracing::info!(id = %user.id, username = %user.username, "User created");
    Ok(())
}
