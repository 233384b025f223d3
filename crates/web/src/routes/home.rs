//! Home route handler.

use axum::Json;
use serde::Serialize;

use crate::middleware::OptionalAuth;

/// Session status for the landing page.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub authenticated: bool,
    pub username: Option<String>,
}

/// Who, if anyone, is signed in.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Json<HomePage> {
    Json(HomePage {
        authenticated: user.is_some(),
        username: user.map(|u| u.username.into_inner()),
    })
}
