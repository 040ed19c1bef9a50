//! Application configuration loaded from environment variables.

use std::time::Duration;

use payments::RazorpayConfig;
use payments::razorpay::DEFAULT_BASE_URL;
use payments::registry::DEFAULT_ORDER_TTL_SECS;
use thiserror::Error;

/// Errors raised while reading configuration. Any of them aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET`: gateway credentials (required)
/// - `RAZORPAY_BASE_URL`: gateway host (default: `https://api.razorpay.com`)
/// - `GATEWAY_TIMEOUT_MS`: gateway request timeout (default: `10000`)
/// - `ORDER_TTL_SECS`: how long a created order stays verifiable (default: `1800`)
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: String,
    pub database_max_connections: u32,
    pub razorpay: RazorpayConfig,
    pub order_ttl: chrono::Duration,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        let timeout_ms: u64 = parse_or(&lookup, "GATEWAY_TIMEOUT_MS", 10_000)?;
        let razorpay = RazorpayConfig::new(
            required("RAZORPAY_KEY_ID")?,
            required("RAZORPAY_KEY_SECRET")?,
        )
        .with_base_url(
            lookup("RAZORPAY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )
        .with_timeout(Duration::from_millis(timeout_ms));

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            razorpay,
            order_ttl: chrono::Duration::seconds(parse_or(
                &lookup,
                "ORDER_TTL_SECS",
                DEFAULT_ORDER_TTL_SECS,
            )?),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key,
                value: raw.clone(),
            }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: String::new(),
            database_max_connections: 5,
            razorpay: RazorpayConfig::new("", ""),
            order_ttl: chrono::Duration::seconds(DEFAULT_ORDER_TTL_SECS),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("razorpay", &self.razorpay)
            .field("order_ttl", &self.order_ttl)
            .finish()
    }
}
