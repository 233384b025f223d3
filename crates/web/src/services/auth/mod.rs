//! Authentication service.
//!
//! Provides username and password authentication backed by Argon2id hashes.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use tracing::warn;

use pantry_core::Username;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length for self-service registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash verified against when the username is unknown, so a missing user
/// costs the same as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("pantry-timing-equaliser").ok());

/// Authentication service.
///
/// Handles user registration, credential checks, and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Look up a user by exact username.
    ///
    /// No trimming or case folding happens here. A name that could never be
    /// stored (blank, padded, too long) is simply absent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let Some(username) = exact_username(username) else {
            return Ok(None);
        };

        Ok(self.users.get_by_username(&username).await?)
    }

    /// Create a user, hashing the password before it is stored.
    ///
    /// Uniqueness is left to the storage constraint; a duplicate leaves the
    /// existing row untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn create(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let password_hash = hash_password(password)?;

        self.users
            .create_with_password(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Self-service registration.
    ///
    /// Checks run in order: both fields present, confirmation matches,
    /// password long enough. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields`, `AuthError::PasswordMismatch` or
    /// `AuthError::WeakPassword` for rejected input, and the errors of
    /// [`Self::create`] otherwise.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        validate_password(password)?;

        self.create(username, password).await
    }

    /// Check a username and password pair.
    ///
    /// An unknown user yields `false`, exactly like a wrong password, after
    /// the same amount of hashing work.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        Ok(self.authenticate(username, password).await?.is_some())
    }

    /// Login with username and password.
    ///
    /// The submitted username is trimmed before the exact lookup; the
    /// password is used as given.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        self.authenticate(username.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let stored = match exact_username(username) {
            Some(username) => self.users.get_password_hash(&username).await?,
            None => None,
        };

        let Some((user, password_hash)) = stored else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            warn!("login attempt for unknown user");
            return Ok(None);
        };

        if verify_password(password, &password_hash).is_err() {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }
}

/// `raw` as a `Username`, provided parsing leaves it unchanged.
fn exact_username(raw: &str) -> Option<Username> {
    Username::parse(raw)
        .ok()
        .filter(|username| username.as_str() == raw)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let a = hash_password("hello123").unwrap();
        let b = hash_password("hello123").unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("hello123"));
        assert!(verify_password("hello123", &a).is_ok());
        assert!(verify_password("hello124", &a).is_err());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_dummy_hash_is_available() {
        assert!(DUMMY_HASH.is_some());
    }

    #[tokio::test]
    async fn test_create_then_verify() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        auth.create("admin", "password123").await.unwrap();

        assert!(auth.verify("admin", "password123").await.unwrap());
        assert!(!auth.verify("admin", "password124").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_unknown_user_same_shape_as_wrong_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        auth.create("admin", "password123").await.unwrap();

        let wrong = auth.verify("admin", "nope").await;
        let unknown = auth.verify("ghost", "nope").await;
        assert!(matches!(wrong, Ok(false)));
        assert!(matches!(unknown, Ok(false)));
    }

    #[tokio::test]
    async fn test_find_by_username_is_exact() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        let created = auth.create("user", "hello123").await.unwrap();

        assert_eq!(auth.find_by_username("user").await.unwrap(), Some(created));
        assert!(auth.find_by_username("USER").await.unwrap().is_none());
        assert!(auth.find_by_username(" user").await.unwrap().is_none());
        assert!(auth.find_by_username("user ").await.unwrap().is_none());
        assert!(auth.find_by_username("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_does_not_trim_username() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        auth.create("admin", "password123").await.unwrap();

        assert!(!auth.verify(" admin", "password123").await.unwrap());
        assert!(!auth.verify("admin\t", "password123").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_create_keeps_original_password() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        let original = auth.create("admin", "password123").await.unwrap();

        let err = auth.create("admin", "other-password").await.unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));

        assert_eq!(auth.find_by_username("admin").await.unwrap(), Some(original));
        assert!(auth.verify("admin", "password123").await.unwrap());
        assert!(!auth.verify("admin", "other-password").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rules_in_order() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.register("  ", "abcdef", "abcdef").await,
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            auth.register("carol", "", "").await,
            Err(AuthError::MissingFields)
        ));
        // Mismatch is reported before length.
        assert!(matches!(
            auth.register("carol", "abc", "abd").await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            auth.register("carol", "abcde", "abcde").await,
            Err(AuthError::WeakPassword(_))
        ));

        let user = auth.register("carol", "abcdef", "abcdef").await.unwrap();
        assert_eq!(user.username.as_str(), "carol");
    }

    #[tokio::test]
    async fn test_login() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        let created = auth.create("user", "hello123").await.unwrap();

        assert_eq!(auth.login("user", "hello123").await.unwrap(), created);
        // The login form trims the submitted name.
        assert_eq!(auth.login("  user ", "hello123").await.unwrap(), created);
        assert!(matches!(
            auth.login("user", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "hello123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "hello123").await,
            Err(AuthError::MissingFields)
        ));
    }
}
