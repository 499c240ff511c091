//! HTTP transport for the Delivery API.
//!
//! Performs authenticated GET requests against the configured space and
//! returns parsed JSON bodies. Non-2xx responses surface as structured
//! [`Error::Api`] values with the response body unwrapped.

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::client::retry::{retry_api, BackoffParams};
use crate::config::{ApiScope, ClientConfig};
use crate::error::{Error, Result};
use crate::VERSION;

/// User agent string for API requests.
fn user_agent() -> String {
    format!("sdk.content-delivery/{} (rust)", VERSION)
}

/// Transport over the Delivery API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is invalid; no
    /// request is attempted.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The configuration this transport was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Make one authenticated GET request.
    async fn request(
        &self,
        scope: ApiScope,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value> {
        let url = self.config.endpoint_url(scope, path);
        let request_id = Uuid::new_v4().to_string();
        debug!(%url, params = params.len(), "delivery API request");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.access_token))
            .header("X-Request-Id", &request_id)
            .query(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an API response, extracting errors.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), status_text, body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse response: {}", e)))
    }

    /// GET with the default retry policy.
    pub async fn get(
        &self,
        scope: ApiScope,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value> {
        let backoff = BackoffParams::default();
        retry_api(
            || async { self.request(scope, path, params).await },
            &backoff,
            self.config.debug,
        )
        .await
    }

    /// GET with the more lenient sync-feed retry policy.
    pub async fn get_sync_page(&self, params: &[(String, String)]) -> Result<Value> {
        let backoff = BackoffParams::for_sync();
        retry_api(
            || async { self.request(ApiScope::Environment, "sync", params).await },
            &backoff,
            self.config.debug,
        )
        .await
    }
}
