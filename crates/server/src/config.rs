//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `USER_SERVICE_DATABASE_URL` - `MongoDB` connection string (host, credentials,
//!   auth source). Falls back to `DATABASE_URL`.
//!
//! ## Optional
//! - `USER_SERVICE_HOST` - Bind address (default: 127.0.0.1)
//! - `USER_SERVICE_PORT` - Listen port (default: 8080)
//! - `USER_SERVICE_DATABASE` - Database name (default: `user_service`)
//! - `USER_SERVICE_COLLECTION` - Collection name (default: `users`)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Accepted connection string schemes.
const MONGODB_SCHEMES: &[&str] = &["mongodb://", "mongodb+srv://"];

/// Characters `MongoDB` does not allow in database names.
const INVALID_DATABASE_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$'];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `MongoDB` connection URL (contains credentials)
    pub database_url: SecretString,
    /// Database holding the users collection
    pub database_name: String,
    /// Collection holding user documents
    pub collection_name: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(&env, "USER_SERVICE_DATABASE_URL")?;
        validate_database_url(&database_url, "USER_SERVICE_DATABASE_URL")?;

        let database_name = get_env_or_default(&env, "USER_SERVICE_DATABASE", "user_service");
        validate_database_name(&database_name, "USER_SERVICE_DATABASE")?;

        let collection_name = get_env_or_default(&env, "USER_SERVICE_COLLECTION", "users");
        validate_collection_name(&collection_name, "USER_SERVICE_COLLECTION")?;

        let host = get_env_or_default(&env, "USER_SERVICE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("USER_SERVICE_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default(&env, "USER_SERVICE_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("USER_SERVICE_PORT".to_string(), e.to_string())
            })?;

        let log_format = match env("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let sentry_dsn = env("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            database_url,
            database_name,
            collection_name,
            host,
            port,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    env: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    env(primary_key)
        .or_else(|| env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that the connection string uses a `MongoDB` scheme.
fn validate_database_url(url: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = url.expose_secret();
    if MONGODB_SCHEMES.iter().any(|scheme| value.starts_with(scheme)) {
        return Ok(());
    }
    Err(ConfigError::InvalidEnvVar(
        var_name.to_string(),
        format!("must start with one of {}", MONGODB_SCHEMES.join(", ")),
    ))
}

/// Validate a database name against `MongoDB` naming rules.
fn validate_database_name(name: &str, var_name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "cannot be empty".to_string(),
        ));
    }
    if let Some(c) = name.chars().find(|c| INVALID_DATABASE_CHARS.contains(c)) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("contains invalid character '{c}'"),
        ));
    }
    Ok(())
}

/// Validate a collection name against `MongoDB` naming rules.
fn validate_collection_name(name: &str, var_name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "cannot be empty".to_string(),
        ));
    }
    if name.contains('$') {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "cannot contain '$'".to_string(),
        ));
    }
    if name.starts_with("system.") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "'system.' prefix is reserved".to_string(),
        ));
    }
    Ok(())
}
