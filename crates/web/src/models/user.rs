//! User domain types.

use pantry_core::{UserId, Username};

/// A catalog user (domain type).
///
/// The password hash is deliberately not part of this type; it is only ever
/// read alongside a user by [`crate::db::UserRepository::get_password_hash`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique and case-sensitive.
    pub username: Username,
}
