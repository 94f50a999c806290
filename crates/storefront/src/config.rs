//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>);
//!   an `https` URL turns on secure session cookies
//! - `CATALOG_PATH` - JSON file of products to serve instead of the built-in set
//! - `CATALOG_LATENCY_MS` - Simulated catalog lookup latency (default: 300)
//! - `ADD_TO_CART_COOLDOWN_MS` - Delay before another add-to-cart is accepted
//!   once a lookup settles (default: 500)
//! - `NOTIFICATION_TTL_MS` - How long notifications stay on screen (default: 3000)
//! - `IMAGE_BASE_PATH` - Prefix for relative cart image paths (default: /static/images/)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Optional JSON catalog file
    pub catalog_path: Option<PathBuf>,
    /// Simulated latency of each catalog lookup
    pub catalog_latency: Duration,
    /// Add-to-cart cooldown after a lookup settles
    pub add_to_cart_cooldown: Duration,
    /// Lifetime of a rendered notification
    pub notification_ttl: Duration,
    /// Most session records held in memory before the oldest are evicted
    pub session_capacity: u64,
    /// Prefix that replaces `../images/` in stored image paths
    pub image_base_path: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            catalog_latency: Duration::from_millis(300),
            add_to_cart_cooldown: Duration::from_millis(500),
            notification_ttl: Duration::from_millis(3000),
            session_capacity: 100_000,
            image_base_path: "/static/images/".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", defaults.host)?,
            port: parse_env_or("STOREFRONT_PORT", defaults.port)?,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", &defaults.base_url),
            catalog_path: get_optional_env("CATALOG_PATH").map(PathBuf::from),
            catalog_latency: millis_env_or("CATALOG_LATENCY_MS", defaults.catalog_latency)?,
            add_to_cart_cooldown: millis_env_or(
                "ADD_TO_CART_COOLDOWN_MS",
                defaults.add_to_cart_cooldown,
            )?,
            notification_ttl: millis_env_or("NOTIFICATION_TTL_MS", defaults.notification_ttl)?,
            session_capacity: parse_env_or("SESSION_MAX_ENTRIES", defaults.session_capacity)?,
            image_base_path: get_env_or_default("IMAGE_BASE_PATH", &defaults.image_base_path),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

/// Parse a millisecond duration variable.
fn millis_env_or(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| {
        parse_value::<u64>(key, &raw).map(Duration::from_millis)
    })
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
