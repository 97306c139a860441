//! Configuration management for the blog server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The server binary calls `dotenvy::dotenv()` first, so a `.env` file works
//! too.

use blog_postgres::PostgresConfig;
use http::HeaderValue;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration rejected at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ALLOWED_ORIGIN` cannot be sent as a header
    #[error("ALLOWED_ORIGIN is not a valid header value: {0:?}")]
    InvalidOrigin(String),

    /// Database settings failed validation
    #[error(transparent)]
    Postgres(#[from] blog_postgres::ConfigError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// Prometheus exporter configuration
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Single origin allowed to read responses cross-origin
    pub allowed_origin: String,
    /// Mark session cookies `Secure`
    pub session_cookie_secure: bool,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// Metrics configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Install the Prometheus exporter
    pub enabled: bool,
    /// Metrics server host (for Prometheus scraping)
    pub host: String,
    /// Metrics server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8443),
                allowed_origin: lookup("ALLOWED_ORIGIN")
                    .unwrap_or_else(|| "https://www.redhand.vip".to_string()),
                session_cookie_secure: lookup("SESSION_COOKIE_SECURE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
                shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
            postgres: PostgresConfig::from_lookup(&lookup),
            metrics: MetricsConfig {
                enabled: lookup("METRICS_ENABLED")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
                host: lookup("METRICS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("METRICS_PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(9090),
            },
        }
    }

    /// Validate settings that would otherwise fail later at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable origin or database settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.allowed_origin_header()?;
        self.postgres.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `ALLOWED_ORIGIN` as a header value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrigin`] if it contains characters not
    /// allowed in a header.
    pub fn allowed_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.allowed_origin.clone()))
    }

    /// Get shutdown timeout as Duration
    #[must_use]
    pub const fn shutdown_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl MetricsConfig {
    /// `host:port` of the exporter.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
