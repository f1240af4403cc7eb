//! Shiprocket logistics API client.
//!
//! Provides read access to Shiprocket's external REST API for channel
//! orders and AWB tracking, plus the order pull used by channel sync.
//!
//! # Architecture
//!
//! - Email/password authentication yields a long-lived bearer token, cached
//!   in memory and re-obtained transparently when it lapses
//! - Payload structs model only the fields the reconciliation core
//!   consumes; unknown keys are ignored on deserialization
//! - Every failure mode (network, non-success status, malformed body)
//!   collapses into one "source unavailable" shape at the adapter seam, so
//!   callers degrade uniformly

pub mod auth;
pub mod client;
pub mod orders;

pub use client::ShiprocketClient;
pub use orders::*;

use thiserror::Error;

/// Errors that can occur when talking to the Shiprocket API.
#[derive(Debug, Error)]
pub enum ShiprocketError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shiprocket.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed (invalid email/password).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Bearer token rejected upstream; the cached token was dropped.
    #[error("Access token expired")]
    TokenExpired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shiprocket_error_display() {
        let err = ShiprocketError::NotFound("/v1/external/orders".to_string());
        assert_eq!(err.to_string(), "Not found: /v1/external/orders");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShiprocketError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_token_expired_error() {
        let err = ShiprocketError::TokenExpired;
        assert_eq!(err.to_string(), "Access token expired");
    }

    #[test]
    fn test_authentication_failed_error() {
        let err = ShiprocketError::AuthenticationFailed("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "Authentication failed: Invalid credentials");
    }
}
