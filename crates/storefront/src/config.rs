//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `USUBA_DATABASE_URL` - `PostgreSQL` connection string for the session store
//!   (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `USUBA_HOST` - Bind address (default: 127.0.0.1)
//! - `USUBA_PORT` - Listen port (default: 3000)
//! - `USUBA_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `USUBA_CONTENT_DIR` - Menu content directory (default: crates/storefront/content)
//! - `USUBA_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `USUBA_VENUE_NAME` - Name shown on the waiter view (default: Usuba Sushi Bar & Izakaya)
//! - `USUBA_RATE_LIMIT` - Rate limit cart actions (default: true)
//! - `USUBA_LOG_JSON` - Emit JSON logs (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default venue name printed at the foot of the waiter view.
pub const DEFAULT_VENUE_NAME: &str = "Usuba Sushi Bar & Izakaya";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding `menus/*.md`
    pub content_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Venue name shown on the waiter view
    pub venue_name: String,
    /// Whether cart mutation routes are rate limited
    pub rate_limit: bool,
    /// Whether logs are emitted as JSON
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("USUBA_DATABASE_URL")?;
        let host = parse_env("USUBA_HOST", "127.0.0.1")?;
        let port = parse_env("USUBA_PORT", "3000")?;
        let base_url = get_env_or_default("USUBA_BASE_URL", "http://localhost:3000");
        let content_dir =
            PathBuf::from(get_env_or_default("USUBA_CONTENT_DIR", "crates/storefront/content"));
        let static_dir =
            PathBuf::from(get_env_or_default("USUBA_STATIC_DIR", "crates/storefront/static"));
        let venue_name = get_env_or_default("USUBA_VENUE_NAME", DEFAULT_VENUE_NAME);
        let rate_limit = parse_env("USUBA_RATE_LIMIT", "true")?;
        let log_json = parse_env("USUBA_LOG_JSON", "false")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            content_dir,
            static_dir,
            venue_name,
            rate_limit,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., USUBA_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
