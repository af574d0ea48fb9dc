//! Paced, retrying JSON client shared by the source and destination adapters.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RemoteError, Result};
use crate::pacer::Pacer;
use crate::retry::RetryPolicy;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// HTTP client for one remote service.
///
/// Every attempt, retries included, waits on the service's [`Pacer`] first.
/// Responses with 429 or 5xx are retried per the [`RetryPolicy`]; other
/// non-2xx statuses fail immediately with [`RemoteError::Api`].
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
    pacer: Arc<Pacer>,
    retry: RetryPolicy,
}

impl RemoteClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the service (e.g., "https://api.notion.com/v1")
    /// * `headers` - Headers sent with every request (auth, versioning)
    /// * `pacer` - Throttle shared by every client of the same service
    pub fn new(base_url: &str, headers: HeaderMap, pacer: Arc<Pacer>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        let mut headers = headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            pacer,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(RemoteError::api(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize response. Body: {}, Error: {}", body, e);
            RemoteError::Json(e)
        })
    }

    /// Sends `method path` with an optional JSON payload and decodes the body.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<T> {
        self.send_with_query(method, path, &[], payload).await
    }

    /// Like [`RemoteClient::send`] with query parameters appended.
    pub async fn send_with_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        self.retry
            .run(|| self.send_once(method.clone(), &url, query, payload))
            .await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        payload: Option<&Value>,
    ) -> Result<T> {
        self.pacer.wait().await;
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }
}

/// Bearer authorization header value, rejecting blank or malformed tokens.
pub(crate) fn bearer(token: &str) -> Result<HeaderValue> {
    let token = token.trim();
    if token.is_empty() {
        return Err(RemoteError::auth("Access token unavailable"));
    }
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| RemoteError::auth("Invalid access token format"))
}
