//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `PANTRY_DATABASE_URL` - SQLite connection string (fallback `DATABASE_URL`,
//!   default `sqlite://pantry.db`)
//! - `PANTRY_HOST` - Bind address (default: 127.0.0.1)
//! - `PANTRY_PORT` - Listen port (default: 5000)
//! - `PANTRY_BASE_URL` - Public URL (default: `http://localhost:5000`); an
//!   `https` URL turns on secure session cookies
//! - `PANTRY_SEED_SAMPLE_DATA` - Seed default users and products into empty
//!   tables on startup (default: true)
//! - `PANTRY_LOG_JSON` - Emit logs as flattened JSON lines (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pantry.db";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// SQLite connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: Url,
    /// Whether empty tables get the sample users and products
    pub seed_sample_data: bool,
    /// Whether logs are written as JSON lines instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PANTRY_DATABASE_URL");
        let host = get_env_or_default("PANTRY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PANTRY_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PANTRY_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PANTRY_PORT".to_string(), e.to_string()))?;
        let base_url = Url::parse(&get_env_or_default("PANTRY_BASE_URL", "http://localhost:5000"))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PANTRY_BASE_URL".to_string(), e.to_string())
            })?;
        let seed_sample_data = parse_bool(
            "PANTRY_SEED_SAMPLE_DATA",
            &get_env_or_default("PANTRY_SEED_SAMPLE_DATA", "true"),
        )?;
        let log_json = parse_bool(
            "PANTRY_LOG_JSON",
            &get_env_or_default("PANTRY_LOG_JSON", "false"),
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            seed_sample_data,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the application is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`, then the default file.
fn get_database_url(primary_key: &str) -> SecretString {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_or_else(
            |_| SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
