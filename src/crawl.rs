//! Crawl operations: start, status polling, cancellation, and the v2
//! params preview.

use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{FirecrawlError, Result};
use crate::types::{body_with_url, validate_url, ApiVersion, CrawlParams, Document};
use crate::FirecrawlClient;

/// A started crawl job.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    pub id: String,
    /// Canonical job URL, when the service reports one.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrawlStartResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    warning: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Status of a crawl job, as reported by the service. The client never
/// writes this; it only reads whatever the last poll returned.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub completed: Option<u32>,
    /// Crawled documents; populated once the job completes.
    #[serde(default)]
    pub data: Vec<Document>,
}

impl CrawlStatus {
    pub fn is_running(&self) -> bool {
        self.has_status("running")
    }

    pub fn is_completed(&self) -> bool {
        self.has_status("completed")
    }

    pub fn is_failed(&self) -> bool {
        self.has_status("failed")
    }

    fn has_status(&self, expected: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(expected))
    }
}

/// Response from a crawl cancellation.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelStatus {
    #[serde(default)]
    pub status: Option<String>,
}

impl FirecrawlClient {
    /// Start an asynchronous crawl job. Returns immediately with the job
    /// handle; progress is read through [`crawl_status`] or
    /// [`wait_for_crawl`].
    ///
    /// A non-empty `idempotency_key` lets the service deduplicate
    /// repeated start requests.
    ///
    /// [`crawl_status`]: FirecrawlClient::crawl_status
    /// [`wait_for_crawl`]: FirecrawlClient::wait_for_crawl
    pub async fn start_crawl(
        &self,
        url: &str,
        params: &CrawlParams,
        idempotency_key: Option<&str>,
    ) -> Result<CrawlJob> {
        validate_url(url)?;
        let body = body_with_url(url, params)?;
        let response: CrawlStartResponse = self
            .transport
            .execute(
                Method::POST,
                &self.version.path("/crawl"),
                Some(&body),
                idempotency_key,
            )
            .await?;

        if !response.success {
            return Err(FirecrawlError::Api(format!(
                "crawl start failed: {}",
                response.warning.as_deref().unwrap_or("unknown error")
            )));
        }
        let id = response
            .id
            .ok_or_else(|| FirecrawlError::Api("crawl start returned no job id".to_string()))?;

        info!(crawl_id = %id, url, "crawl started");
        Ok(CrawlJob {
            id,
            url: response.url,
        })
    }

    /// Read the current status of a crawl job.
    pub async fn crawl_status(&self, id: &str) -> Result<CrawlStatus> {
        if id.trim().is_empty() {
            return Err(FirecrawlError::validation("id", "job id must not be empty"));
        }
        self.transport
            .execute(
                Method::GET,
                &self.version.path(&format!("/crawl/{id}")),
                None,
                None,
            )
            .await
    }

    /// Poll a crawl job until it reaches a terminal state, sleeping
    /// `interval` between polls (the client's configured poll interval
    /// when `None`).
    ///
    /// Terminal means any status other than case-insensitive `running`.
    /// There is no iteration bound or overall deadline: bounding total
    /// wall-clock time is the caller's job, e.g. by wrapping the future
    /// in `tokio::time::timeout` or racing it against a cancellation
    /// token. Any transport or decode error aborts the loop.
    pub async fn wait_for_crawl(
        &self,
        id: &str,
        interval: Option<Duration>,
    ) -> Result<CrawlStatus> {
        let interval = interval.unwrap_or(self.poll_interval);
        loop {
            let status = self.crawl_status(id).await?;
            if !status.is_running() {
                info!(
                    crawl_id = id,
                    status = status.status.as_deref().unwrap_or("unknown"),
                    documents = status.data.len(),
                    "crawl reached terminal state"
                );
                return Ok(status);
            }
            debug!(
                crawl_id = id,
                completed = ?status.completed,
                total = ?status.total,
                "crawl still running"
            );
            tokio::time::sleep(interval).await;
        }
    }

    /// Start a crawl and poll it to completion: [`start_crawl`] followed
    /// by [`wait_for_crawl`] with the client's poll interval.
    ///
    /// [`start_crawl`]: FirecrawlClient::start_crawl
    /// [`wait_for_crawl`]: FirecrawlClient::wait_for_crawl
    pub async fn crawl(
        &self,
        url: &str,
        params: &CrawlParams,
        idempotency_key: Option<&str>,
    ) -> Result<CrawlStatus> {
        let job = self.start_crawl(url, params, idempotency_key).await?;
        self.wait_for_crawl(&job.id, None).await
    }

    /// Cancel a crawl job.
    pub async fn cancel_crawl(&self, id: &str) -> Result<CancelStatus> {
        if id.trim().is_empty() {
            return Err(FirecrawlError::validation("id", "job id must not be empty"));
        }
        info!(crawl_id = id, "cancelling crawl");
        self.transport
            .execute(
                Method::DELETE,
                &self.version.path(&format!("/crawl/{id}")),
                None,
                None,
            )
            .await
    }

    /// Preview the crawl parameters the service would derive from a
    /// natural-language prompt (v2 only). The payload is opaque JSON.
    pub async fn crawl_params_preview(&self, url: &str, prompt: &str) -> Result<Value> {
        if self.version == ApiVersion::V1 {
            return Err(FirecrawlError::validation(
                "api_version",
                "params-preview requires the v2 API",
            ));
        }
        validate_url(url)?;
        let body = json!({ "url": url, "prompt": prompt });
        self.transport
            .execute(
                Method::POST,
                "/v2/crawl/params-preview",
                Some(&body),
                None,
            )
            .await
    }
}
