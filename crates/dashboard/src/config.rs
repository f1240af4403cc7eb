//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `SHIPROCKET_EMAIL` - Shiprocket API user email
//! - `SHIPROCKET_PASSWORD` - Shiprocket API user password
//!
//! ## Optional
//! - `SHIPROCKET_BASE_URL` - API base URL (default: <https://apiv2.shiprocket.in>)
//! - `REFRESH_INTERVAL_SECS` - live view polling cadence (default: 30)
//! - `LISTING_CACHE_TTL_SECS` - listing cache TTL (default: 300)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SHIPROCKET_BASE_URL: &str = "https://apiv2.shiprocket.in";
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
const DEFAULT_LISTING_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard service configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `PostgreSQL` database connection URL (contains password).
    pub database_url: SecretString,
    /// Shiprocket API configuration.
    pub shiprocket: ShiprocketConfig,
    /// Polling cadence for live views.
    pub refresh_interval: Duration,
    /// How long cached listings stay valid.
    pub listing_cache_ttl: Duration,
}

/// Shiprocket API configuration.
#[derive(Debug, Clone)]
pub struct ShiprocketConfig {
    /// API base URL.
    pub base_url: String,
    /// API user email.
    pub email: String,
    /// API user password.
    pub password: SecretString,
}

impl DashboardConfig {
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

        let database_url = SecretString::from(get_required_env("DATABASE_URL")?);
        let shiprocket = ShiprocketConfig::from_env()?;
        let refresh_interval =
            get_secs_or_default("REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        let listing_cache_ttl =
            get_secs_or_default("LISTING_CACHE_TTL_SECS", DEFAULT_LISTING_CACHE_TTL_SECS)?;

        Ok(Self {
            database_url,
            shiprocket,
            refresh_interval,
            listing_cache_ttl,
        })
    }
}

impl ShiprocketConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("SHIPROCKET_BASE_URL", DEFAULT_SHIPROCKET_BASE_URL),
            email: get_required_env("SHIPROCKET_EMAIL")?,
            password: SecretString::from(get_required_env("SHIPROCKET_PASSWORD")?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an optional duration-in-seconds variable with a default.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let secs = match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}
