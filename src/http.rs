//! HTTP transport: issues one API call with auth headers, bounded retry
//! for idempotent failures, and structured error mapping.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FirecrawlError, Result};

/// Statuses worth retrying. Only GET requests are eligible: mutating
/// methods cannot be assumed idempotent at this layer.
const RETRY_STATUSES: [u16; 3] = [502, 503, 504];
const MAX_RETRIES: u32 = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub(crate) struct Transport {
    client: reqwest::Client,
    pub(crate) base_url: String,
    api_key: String,
}

impl Transport {
    pub(crate) fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub(crate) fn set_client(&mut self, client: reqwest::Client) {
        self.client = client;
    }

    /// Execute one API call and decode the JSON response.
    ///
    /// GET requests never carry a body; POST/PUT bodies are JSON with
    /// `Content-Type: application/json`; DELETE may go out bodyless.
    /// `Idempotency-Key` is attached only when a non-empty key is given.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        idempotency_key: Option<&str>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut attempt = 0u32;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", self.api_key));
            if let Some(key) = idempotency_key.filter(|k| !k.is_empty()) {
                request = request.header("Idempotency-Key", key);
            }
            if method != Method::GET {
                if let Some(body) = body {
                    request = request
                        .header("Content-Type", "application/json")
                        .json(body);
                }
            }

            let response = request.send().await.map_err(|e| {
                warn!(%url, error = %e, "request failed without a response");
                FirecrawlError::from(e)
            })?;

            let status = response.status();
            let raw = response.text().await.map_err(FirecrawlError::from)?;

            if status.is_success() {
                return serde_json::from_str(&raw).map_err(|e| {
                    FirecrawlError::Decode(format!("unexpected response shape: {e}"))
                });
            }

            let retriable =
                method == Method::GET && RETRY_STATUSES.contains(&status.as_u16());
            if retriable && attempt < MAX_RETRIES {
                attempt += 1;
                debug!(
                    %url,
                    status = status.as_u16(),
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "retrying idempotent request"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            warn!(%url, status = status.as_u16(), "API request failed");
            return Err(http_error(status, raw));
        }
    }
}

/// Build an HTTP error from a non-2xx response, pulling a detail message
/// out of the JSON error body when one is present.
fn http_error(status: StatusCode, body: String) -> FirecrawlError {
    let mut message = status.canonical_reason().unwrap_or_default().to_string();
    if let Some(detail) = error_body_message(&body) {
        if message.is_empty() {
            message = detail;
        } else {
            message = format!("{message}: {detail}");
        }
    }
    if message.is_empty() {
        message = format!("HTTP {}", status.as_u16());
    }
    FirecrawlError::Http {
        status: status.as_u16(),
        message,
        body,
    }
}

/// First non-empty of `message`/`error`/`detail`/`warning` in a JSON error
/// body. Unparseable bodies yield nothing; the caller falls back to the
/// HTTP reason phrase.
fn error_body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    for key in ["message", "error", "detail", "warning"] {
        if let Some(text) = obj.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}
