//! Shiprocket authentication.
//!
//! Email/password login yields a bearer token valid for ten days; the
//! client re-authenticates shortly before expiry. There is no refresh-token
//! leg - login is the refresh.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ShiprocketError;

/// Login endpoint path, relative to the configured base URL.
const LOGIN_PATH: &str = "/v1/external/auth/login";

/// Token lifetime Shiprocket grants on login (10 days), in seconds.
const TOKEN_LIFETIME_SECS: i64 = 10 * 24 * 60 * 60;

/// Bearer token obtained from Shiprocket authentication.
#[derive(Debug, Clone)]
pub struct ShiprocketToken {
    /// Bearer token for API requests.
    pub token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

/// Request body for Shiprocket authentication.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from the Shiprocket login endpoint.
#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Error response from the Shiprocket login endpoint.
#[derive(Deserialize)]
struct LoginErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Authenticate with Shiprocket using email and password.
///
/// # Errors
///
/// Returns `ShiprocketError::AuthenticationFailed` if credentials are
/// invalid, `ShiprocketError::Http` on network failures.
#[instrument(skip(client, password), fields(email = %email))]
pub async fn authenticate(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &SecretString,
) -> Result<ShiprocketToken, ShiprocketError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(format!("{base_url}{LOGIN_PATH}"))
        .json(&LoginRequest {
            email,
            password: password.expose_secret(),
        })
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let login: LoginResponse = response.json().await?;

        Ok(ShiprocketToken {
            token: SecretString::from(login.token),
            expires_at: now + TOKEN_LIFETIME_SECS,
        })
    } else if status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
    {
        let error_response: LoginErrorResponse = response
            .json()
            .await
            .unwrap_or(LoginErrorResponse { message: None });

        let message = error_response
            .message
            .unwrap_or_else(|| "Invalid credentials".to_string());

        Err(ShiprocketError::AuthenticationFailed(message))
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(ShiprocketError::AuthenticationFailed(format!(
            "HTTP {status}: {error_text}"
        )))
    }
}

impl ShiprocketToken {
    /// Check if the token has lapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        // Consider expired if less than 60 seconds remaining
        now >= self.expires_at - 60
    }
}
