//! Session gate: authentication extractors and session helpers.
//!
//! A request is authenticated when its session holds a [`CurrentUser`].
//! Handlers receive that value from [`RequireAuth`] and pass it on
//! explicitly; nothing else records who is signed in.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Where unauthenticated UI requests are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires an authenticated user.
///
/// If nobody is logged in, UI paths redirect to the login page and `/api/`
/// paths answer `401` with a JSON error body.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to login page (for UI requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl AuthRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |uri| uri.path());
        let rejection = AuthRejection::for_path(path);

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(rejection)?;

        let user = current_user(session).await.ok_or(rejection)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// The signed-in user, if any. An unreadable session counts as signed out.
async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Whether the session carries an authenticated identity.
pub async fn is_authenticated(session: &Session) -> bool {
    current_user(session).await.is_some()
}

/// Helper to set the current user in the session.
///
/// The session ID is rotated first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pantry_core::{UserId, Username};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[allow(clippy::unwrap_used)]
    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            username: Username::parse("admin").unwrap(),
        }
    }

    #[test]
    fn test_rejection_depends_on_path() {
        assert_eq!(
            AuthRejection::for_path("/api/products"),
            AuthRejection::Unauthorized
        );
        assert_eq!(
            AuthRejection::for_path("/products"),
            AuthRejection::RedirectToLogin
        );
    }

    #[test]
    fn test_unauthorized_response_is_json_401() {
        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_redirect_points_at_login() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], LOGIN_PATH);
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)]
    async fn test_session_round_trip() {
        let session = session();
        assert!(!is_authenticated(&session).await);

        set_current_user(&session, &user()).await.unwrap();
        assert!(is_authenticated(&session).await);
        assert_eq!(current_user(&session).await, Some(user()));

        clear_current_user(&session).await.unwrap();
        assert!(!is_authenticated(&session).await);
    }
}
