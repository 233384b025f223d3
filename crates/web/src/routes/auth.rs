//! Authentication route handlers.
//!
//! Form posts answer with redirects; the outcome travels as a short code in
//! the `error` or `success` query parameter of the target page.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::{MessageQuery, redirect_with};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

const LOGIN_PAGE: &str = "/auth/login";
const REGISTER_PAGE: &str = "/auth/register";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Page data for the login and registration pages.
#[derive(Debug, Serialize)]
pub struct AuthPage {
    pub authenticated: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Login page data.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Json<AuthPage> {
    Json(AuthPage {
        authenticated: user.is_some(),
        error: query.error,
        success: query.success,
    })
}

/// Handle login form submission.
///
/// Unknown users and wrong passwords produce the same redirect.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(user);

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return redirect_with(LOGIN_PAGE, "error", "session").into_response();
            }

            set_sentry_user(&current.id, current.username.as_str());
            info!(user_id = %current.id, "user logged in");
            Redirect::to("/").into_response()
        }
        Err(AuthError::MissingFields) => {
            redirect_with(LOGIN_PAGE, "error", "missing_fields").into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            redirect_with(LOGIN_PAGE, "error", "credentials").into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Registration page data.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Json<AuthPage> {
    Json(AuthPage {
        authenticated: user.is_some(),
        error: query.error,
        success: query.success,
    })
}

/// Handle registration form submission.
///
/// On success the new user is sent to the login page; registration does not
/// sign anyone in.
#[instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let auth = AuthService::new(state.pool());

    let code = match auth
        .register(&form.username, &form.password, &form.confirm_password)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            return redirect_with(LOGIN_PAGE, "success", "registered").into_response();
        }
        Err(AuthError::MissingFields) => "missing_fields",
        Err(AuthError::PasswordMismatch) => "password_mismatch",
        Err(AuthError::WeakPassword(_)) => "password_too_short",
        Err(AuthError::InvalidUsername(_)) => "invalid_username",
        Err(AuthError::UserAlreadyExists) => "username_taken",
        Err(e) => return AppError::from(e).into_response(),
    };

    warn!(reason = code, "registration rejected");
    redirect_with(REGISTER_PAGE, "error", code).into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Clear the session and return to the login page.
///
/// A session that could not be cleared is still signed in, so that case
/// answers `500` rather than the logged-out redirect.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(redirect_with(LOGIN_PAGE, "success", "logged_out"))
}
