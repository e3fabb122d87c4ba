//! Shared HTTP client

use crate::config::ClientConfig;
use crate::endpoints::{NominatimApi, WikipediaApi};
use crate::error::{ApiError, ApiResult};
use facilitymap_core::retry::{retry_async, RetryConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client for the external services
///
/// This client wraps `reqwest` and adds:
/// - A client-identifying User-Agent on every request
/// - Retry with exponential backoff for transient failures
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct MapClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl MapClient {
    /// Create a new client with default configuration and environment overrides
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Access the geocoder endpoint
    #[must_use]
    pub fn nominatim(&self) -> NominatimApi {
        NominatimApi::new(self.clone())
    }

    /// Access the page-summary endpoint
    #[must_use]
    pub fn wikipedia(&self) -> WikipediaApi {
        WikipediaApi::new(self.clone())
    }

    /// GET `url` and decode the JSON body
    ///
    /// A 404 response is an error; use [`MapClient::get_json_opt`] where
    /// a missing resource is an expected answer.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        retry: &RetryConfig,
    ) -> ApiResult<T> {
        self.get_json_opt(url, query, retry)
            .await?
            .ok_or_else(|| ApiError::api_response(404, "Not found"))
    }

    /// GET `url` and decode the JSON body, mapping 404 to `None`
    #[instrument(skip(self, query, retry), fields(request_id))]
    pub async fn get_json_opt<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        retry: &RetryConfig,
    ) -> ApiResult<Option<T>> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = retry_async(retry, ApiError::is_retryable, |attempt| {
            self.execute_single_request(&request_id, url, query, attempt)
        })
        .await;

        match &result {
            Ok(_) => debug!(
                request_id = %request_id,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request succeeded"
            ),
            Err(e) => debug!(
                request_id = %request_id,
                error = %e,
                "Request failed"
            ),
        }
        result
    }

    /// Execute a single request without retry
    async fn execute_single_request<T: DeserializeOwned>(
        &self,
        request_id: &str,
        url: &str,
        query: &[(&str, String)],
        attempt: u32,
    ) -> ApiResult<Option<T>> {
        debug!(request_id = %request_id, url = %url, attempt = attempt + 1, "Sending request");
        let response = self
            .inner
            .get(url)
            .query(query)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await?;
        handle_response(response).await
    }
}

/// Handle HTTP response and deserialize
async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<Option<T>> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if status.is_success() {
        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    } else {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::api_response(status.as_u16(), message))
    }
}
