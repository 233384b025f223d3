//! Integration test harness for the Pantry catalog.
//!
//! [`TestApp`] drives the full axum application (routes, session layer,
//! middleware) against a private in-memory SQLite database. Requests go
//! through `tower::ServiceExt::oneshot`, no socket involved, and the session
//! cookie is carried from one request to the next like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pantry-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
    response::Response,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;
use url::{Url, form_urlencoded};

use pantry_web::config::WebConfig;
use pantry_web::middleware::SESSION_COOKIE_NAME;
use pantry_web::state::AppState;
use pantry_web::{db, middleware, routes, services};

/// A response with its body already collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Redirect target, panicking if this is not a redirect.
    pub fn redirect(&self) -> &str {
        assert!(
            self.status.is_redirection(),
            "expected redirect, got {}",
            self.status
        );
        self.location.as_deref().unwrap()
    }
}

/// The catalog application plus a cookie jar holding one session cookie.
pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Fresh application with an empty, migrated database.
    pub async fn new() -> Self {
        let config = WebConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: Url::parse("http://localhost:5000").unwrap(),
            seed_sample_data: false,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let pool = db::create_pool(&config.database_url).await.unwrap();
        db::migrate(&pool).await.unwrap();
        middleware::migrate_session_store(&pool).await.unwrap();

        let router = routes::app(AppState::new(config, pool.clone()));

        Self {
            pool,
            router,
            cookie: None,
        }
    }

    /// Fresh application with the default accounts and sample products.
    pub async fn seeded() -> Self {
        let app = Self::new().await;
        services::seed_if_empty(&app.pool).await.unwrap();
        app
    }

    /// Seeded application with `admin` already logged in.
    pub async fn logged_in() -> Self {
        let mut app = Self::seeded().await;
        let response = app
            .post_form(
                "/auth/login",
                &[("username", "admin"), ("password", "password123")],
            )
            .await;
        assert_eq!(response.redirect(), "/");
        app
    }

    /// Whether the jar currently holds a session cookie.
    pub const fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a form-encoded POST request.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        self.store_cookie(&response);

        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            location,
            body,
        }
    }

    fn store_cookie(&mut self, response: &Response) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let Some(pair) = value.split(';').next() else {
                continue;
            };
            let Some((name, cookie_value)) = pair.split_once('=') else {
                continue;
            };
            if name.trim() != SESSION_COOKIE_NAME {
                continue;
            }

            let expired = value.to_ascii_lowercase().contains("max-age=0");
            self.cookie = if cookie_value.is_empty() || expired {
                None
            } else {
                Some(pair.trim().to_owned())
            };
        }
    }
}
