//! User repository for database operations.
//!
//! This module provides database access for login accounts. Password hashes
//! never leave this module except through [`UserRepository::get_password_hash`].

use sqlx::{Executor, Sqlite, SqlitePool};

use pantry_core::{UserId, Username};

use super::{BEGIN_WRITE, RepositoryError};
use crate::models::User;

/// Row shape for credential lookups.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: UserId,
    username: Username,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their login name (exact, case-sensitive match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, username
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user together with their stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                User {
                    id: r.id,
                    username: r.username,
                },
                r.password_hash,
            )
        }))
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        insert_user(self.pool, username, password_hash).await
    }

    /// Create every `(username, password_hash)` account only if no user
    /// exists yet.
    ///
    /// The emptiness check and the inserts share one write transaction, so
    /// the table is filled at most once and never partially. Returns the
    /// number of accounts created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `accounts` repeats a username.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_all_if_empty(
        &self,
        accounts: &[(Username, String)],
    ) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        for (username, password_hash) in accounts {
            insert_user(&mut *tx, username, password_hash).await?;
        }
        tx.commit().await?;

        Ok(accounts.len())
    }

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

async fn insert_user<'e, E>(
    executor: E,
    username: &Username,
    password_hash: &str,
) -> Result<User, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r"
        INSERT INTO users (username, password_hash)
        VALUES (?, ?)
        ",
    )
    .bind(username)
    .bind(password_hash)
    .execute(executor)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "username already exists"))?;

    Ok(User {
        id: UserId::new(result.last_insert_rowid()),
        username: username.clone(),
    })
}
