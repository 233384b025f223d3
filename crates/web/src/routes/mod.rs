//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database)
//! GET  /                             - Session status
//!
//! # Auth
//! GET  /auth/login                   - Login page data
//! POST /auth/login                   - Login action
//! GET  /auth/register                - Register page data
//! POST /auth/register                - Register action
//! POST /auth/logout                  - Logout action
//!
//! # Products (requires auth)
//! GET  /products                     - Product listing
//! POST /products                     - Create product
//! GET  /products/search              - Filtered listing (?q=&category=)
//! GET  /products/{id}                - Product detail
//! POST /products/{id}/edit           - Replace product fields
//! POST /products/{id}/delete         - Delete product
//!
//! # API (requires auth, 401 JSON otherwise)
//! GET  /api/products                 - Bulk export
//! GET  /api/categories               - Category list
//! ```

pub mod api;
pub mod auth;
pub mod health;
pub mod home;
pub mod products;

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;
use url::form_urlencoded;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Query parameters carrying a redirect outcome code.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` with a single `key=code` query parameter.
pub(crate) fn redirect_with(path: &str, key: &str, code: &str) -> Redirect {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, code)
        .finish();
    Redirect::to(&format!("{path}?{query}"))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route("/{id}", get(products::show))
        .route("/{id}/edit", post(products::update))
        .route("/{id}/delete", post(products::delete))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products))
        .route("/categories", get(api::categories))
}

/// Create all routes for the catalog.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/api", api_routes())
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    routes()
        .layer(session_layer)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_with_encodes_code() {
        use axum::response::IntoResponse;

        let response = redirect_with("/products", "error", "not found").into_response();
        assert_eq!(response.headers()["location"], "/products?error=not+found");
    }
}
