//! Shiprocket REST API client.
//!
//! Thin JSON-over-HTTP client with an in-memory bearer-token cache. Cheap
//! to clone; all state lives behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::instrument;

use super::ShiprocketError;
use super::auth::{ShiprocketToken, authenticate};
use super::orders::{ShiprocketOrder, ShiprocketOrderList};
use crate::config::ShiprocketConfig;

/// Orders listing endpoint path.
const ORDERS_PATH: &str = "/v1/external/orders";

/// AWB tracking endpoint path prefix.
const TRACK_AWB_PATH: &str = "/v1/external/courier/track/awb";

/// Page size used when walking the full order collection.
const FULL_FETCH_PAGE_SIZE: u32 = 100;

/// Shiprocket REST API client.
///
/// # Authentication
///
/// Uses bearer tokens obtained from email/password authentication. Tokens
/// are cached in memory and re-obtained automatically when they lapse.
#[derive(Clone)]
pub struct ShiprocketClient {
    inner: Arc<ShiprocketClientInner>,
}

struct ShiprocketClientInner {
    client: reqwest::Client,
    base_url: String,
    email: String,
    password: SecretString,
    /// In-memory token cache
    token: RwLock<Option<ShiprocketToken>>,
}

impl ShiprocketClient {
    /// Create a new Shiprocket API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &ShiprocketConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            inner: Arc::new(ShiprocketClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                email: config.email.clone(),
                password: config.password.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Check if a non-lapsed token is cached.
    pub async fn has_valid_token(&self) -> bool {
        self.inner
            .token
            .read()
            .await
            .as_ref()
            .is_some_and(|token| !token.is_expired())
    }

    /// Ensure a usable bearer token, logging in if absent or lapsed.
    async fn ensure_token(&self) -> Result<String, ShiprocketError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.token.expose_secret().to_string());
        }

        let token = authenticate(
            &self.inner.client,
            &self.inner.base_url,
            &self.inner.email,
            &self.inner.password,
        )
        .await?;
        let value = token.token.expose_secret().to_string();
        *self.inner.token.write().await = Some(token);
        Ok(value)
    }

    /// Execute a GET request and deserialize the JSON response.
    #[instrument(skip(self, query))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ShiprocketError> {
        let token = self.ensure_token().await?;

        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ShiprocketError::RateLimited(retry_after));
        }

        // Token revoked upstream; drop the cache so the next call
        // re-authenticates.
        if status == reqwest::StatusCode::UNAUTHORIZED {
            *self.inner.token.write().await = None;
            return Err(ShiprocketError::TokenExpired);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShiprocketError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Shiprocket API returned non-success status"
            );
            return Err(ShiprocketError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Shiprocket response"
            );
            ShiprocketError::Parse(e)
        })
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch one page of channel orders.
    ///
    /// # Errors
    ///
    /// Returns `ShiprocketError` on network failure, non-success status, or
    /// a malformed body.
    pub async fn list_orders(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ShiprocketOrderList, ShiprocketError> {
        self.get_json(
            ORDERS_PATH,
            &[("page", page.to_string()), ("per_page", per_page.to_string())],
        )
        .await
    }

    /// Fetch the complete order collection by walking the API's own
    /// pagination cursor (it is independent of the database's).
    ///
    /// # Errors
    ///
    /// Returns the first page-fetch error encountered; partial collections
    /// are never returned.
    pub async fn list_all_orders(&self) -> Result<Vec<ShiprocketOrder>, ShiprocketError> {
        let mut page = 1;
        let mut orders = Vec::new();

        loop {
            let batch = self.list_orders(page, FULL_FETCH_PAGE_SIZE).await?;
            let total_pages = batch.meta.pagination.total_pages;
            let fetched = batch.data.len();
            orders.extend(batch.data);

            if fetched == 0 || page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = orders.len(), "fetched full shiprocket order collection");
        Ok(orders)
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Fetch the raw tracking payload for an AWB.
    ///
    /// Returns the undecoded JSON body; shape detection and normalization
    /// happen in the tracking normalizer.
    ///
    /// # Errors
    ///
    /// Returns `ShiprocketError::NotFound` when the AWB is unknown upstream,
    /// other `ShiprocketError` variants when the source is unavailable.
    pub async fn track_awb(&self, awb: &str) -> Result<serde_json::Value, ShiprocketError> {
        self.get_json(&format!("{TRACK_AWB_PATH}/{awb}"), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ShiprocketConfig {
        ShiprocketConfig {
            base_url: "https://apiv2.shiprocket.in/".to_string(),
            email: "ops@example.com".to_string(),
            password: SecretString::from("password"),
        }
    }

    #[test]
    fn test_client_creation_strips_trailing_slash() {
        let client = ShiprocketClient::new(&test_config());
        assert_eq!(client.inner.base_url, "https://apiv2.shiprocket.in");
    }

    #[tokio::test]
    async fn test_client_starts_without_token() {
        let client = ShiprocketClient::new(&test_config());
        assert!(!client.has_valid_token().await);
    }
}
