//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the catalog
//! - `STOREFRONT_WHATSAPP_NUMBER` - Number that receives orders, with country and area code
//! - `ZEIDAN_SPREADSHEET` - Spreadsheet ID or link (unless `ZEIDAN_STORE=memory`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CACHE_TTL_SECS` - Catalog cache lifetime (default: 60)
//! - `STOREFRONT_STORE_NAME` - Shop name in page titles (default: Zeidan Parfum)
//! - `ZEIDAN_STORE`, `ZEIDAN_CREDENTIALS_JSON`, `ZEIDAN_CREDENTIALS_FILE` - see `zeidan_sheets::config`
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use zeidan_sheets::SheetsConfig;

const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_STORE_NAME: &str = "Zeidan Parfum";

/// wa.me needs country code + area code + subscriber number.
const MIN_WHATSAPP_DIGITS: usize = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error(transparent)]
    Store(#[from] zeidan_sheets::ConfigError),
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
    /// Digits only
    pub whatsapp_number: String,
    /// Shop name shown in titles and the header
    pub store_name: String,
    /// How long a catalog read is reused
    pub cache_ttl: Duration,
    /// Spreadsheet store settings
    pub sheets: SheetsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
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

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let whatsapp_number = whatsapp_digits(&get_required_env("STOREFRONT_WHATSAPP_NUMBER")?)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_WHATSAPP_NUMBER".to_string(), e)
            })?;
        let store_name = get_env_or_default("STOREFRONT_STORE_NAME", DEFAULT_STORE_NAME);
        let cache_ttl = get_env_or_default(
            "STOREFRONT_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;
        let sheets = SheetsConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            whatsapp_number,
            store_name,
            cache_ttl,
            sheets,
            sentry_dsn,
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

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reduce a phone number to its digits, rejecting numbers too short for wa.me.
fn whatsapp_digits(number: &str) -> Result<String, String> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_WHATSAPP_DIGITS {
        return Err(format!(
            "expected at least {MIN_WHATSAPP_DIGITS} digits including country code (got {})",
            digits.len()
        ));
    }
    Ok(digits)
}
