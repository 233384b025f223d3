//! HTTP middleware stack for the catalog.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span)
//! 4. Security headers
//! 5. Session layer (tower-sessions with SQLite store)
//!
//! The session gate itself is an extractor ([`RequireAuth`]) rather than a
//! layer, so public routes share the same stack.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, LOGIN_PATH, OptionalAuth, RequireAuth, clear_current_user, is_authenticated,
    set_current_user,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, migrate_session_store};
