//! # HTTP configuration store
//!
//! [`ConfigStore`] backed by the server's JSON endpoints:
//!
//! ```text
//! GET  /json          whole raw configuration tree
//! POST /update        { path, new_value }
//! POST /add_block     { parent_path, block_name }
//! POST /delete_block  { block_path }
//! ```
//!
//! This is where every transport concern lives: requests are serialized and
//! spaced at least [`MIN_REQUEST_INTERVAL`] apart, transient failures (HTTP
//! 5xx/429/408 or connect/timeout errors) are retried a bounded number of
//! times at a fixed delay, and a single terminal [`StoreError`] is surfaced
//! on exhaustion. Callers never retry on their own.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::store::ConfigStore;

/// Minimum spacing between two requests on the wire.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);
/// Fixed delay before a retry attempt.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);
/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Serialize)]
struct UpdateRequest<'a> {
    path: &'a str,
    new_value: &'a str,
}

#[derive(Serialize)]
struct AddBlockRequest<'a> {
    parent_path: &'a str,
    block_name: &'a str,
}

#[derive(Serialize)]
struct DeleteBlockRequest<'a> {
    block_path: &'a str,
}

/// HTTP-backed remote configuration store.
pub struct HttpConfigStore {
    http: reqwest::Client,
    base_url: Url,
    max_retries: u32,
    // Held across pace + send so requests hit the wire one at a time.
    last_request: Mutex<Option<Instant>>,
}

impl HttpConfigStore {
    pub fn new(mut base_url: Url) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        // The store may be served under a path prefix (e.g. `/web_config`).
        // A trailing slash makes relative joins keep that prefix.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Self {
            http,
            base_url,
            max_retries: DEFAULT_MAX_RETRIES,
            last_request: Mutex::new(None),
        }
    }

    /// Create a store from a base URL string.
    pub fn from_url(base_url: &str) -> StoreResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| StoreError::new(base_url, err.to_string(), None))?;
        Ok(Self::new(base_url))
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> StoreResult<Url> {
        // Join relative to the (trailing-slash-normalized) base: an
        // absolute-path join would resolve against the host root and drop
        // any base path prefix.
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|err| StoreError::new(endpoint, err.to_string(), None))
    }

    /// Send one request, pacing and retrying as needed, and return the
    /// successful response.
    async fn execute(
        &self,
        endpoint: &str,
        make: impl Fn() -> reqwest::RequestBuilder,
    ) -> StoreResult<reqwest::Response> {
        let mut attempt = 0u32;

        loop {
            let response = {
                let mut last_request = self.last_request.lock().await;

                if let Some(last) = *last_request {
                    let since = last.elapsed();
                    if since < MIN_REQUEST_INTERVAL {
                        tokio::time::sleep(MIN_REQUEST_INTERVAL - since).await;
                    }
                }

                let result = make().send().await;
                *last_request = Some(Instant::now());
                result
            };

            match response {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt < self.max_retries && retryable_status(status) {
                        attempt += 1;
                        tracing::warn!(
                            endpoint,
                            status,
                            attempt,
                            max_retries = self.max_retries,
                            "retrying store request"
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    let message = if body.is_empty() {
                        format!("server returned status {status}")
                    } else {
                        body
                    };
                    tracing::error!(endpoint, status, %message, "store request failed");
                    return Err(StoreError::new(endpoint, message, Some(status)));
                }
                Err(err) => {
                    if attempt < self.max_retries && retryable_transport(&err) {
                        attempt += 1;
                        tracing::warn!(
                            endpoint,
                            error = %err,
                            attempt,
                            max_retries = self.max_retries,
                            "retrying store request"
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }

                    let status = err.status().map(|s| s.as_u16());
                    tracing::error!(endpoint, error = %err, "store request failed");
                    return Err(StoreError::new(endpoint, err.to_string(), status));
                }
            }
        }
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> StoreResult<()> {
        let url = self.endpoint_url(endpoint)?;
        let payload =
            serde_json::to_value(body).map_err(|err| StoreError::new(endpoint, err.to_string(), None))?;

        self.execute(endpoint, || self.http.post(url.clone()).json(&payload))
            .await?;
        Ok(())
    }
}

/// HTTP statuses worth another attempt: server errors, rate limiting, and
/// request timeout.
fn retryable_status(status: u16) -> bool {
    status >= 500 || status == 429 || status == 408
}

fn retryable_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn fetch_config(&self) -> StoreResult<Value> {
        let endpoint = "/json";
        let url = self.endpoint_url(endpoint)?;

        let response = self.execute(endpoint, || self.http.get(url.clone())).await?;
        response
            .json::<Value>()
            .await
            .map_err(|err| StoreError::new(endpoint, err.to_string(), None))
    }

    async fn update_value(&self, path: &str, new_value: &str) -> StoreResult<()> {
        self.post("/update", &UpdateRequest { path, new_value }).await
    }

    async fn add_block(&self, parent_path: &str, block_key: &str) -> StoreResult<()> {
        self.post(
            "/add_block",
            &AddBlockRequest {
                parent_path,
                block_name: block_key,
            },
        )
        .await
    }

    async fn delete_block(&self, block_path: &str) -> StoreResult<()> {
        self.post("/delete_block", &DeleteBlockRequest { block_path })
            .await
    }
}
