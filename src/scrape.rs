//! Scrape operation: fetch one page through the extraction service.

use reqwest::Method;
use tracing::debug;

use crate::error::{FirecrawlError, Result};
use crate::types::{body_with_url, validate_url, Document, Envelope, ScrapeOptions};
use crate::FirecrawlClient;

impl FirecrawlClient {
    /// Scrape a single URL and return the extracted document.
    pub async fn scrape(&self, url: &str, options: &ScrapeOptions) -> Result<Document> {
        validate_url(url)?;
        let body = body_with_url(url, options)?;
        debug!(url, "issuing scrape request");
        let response: Envelope<Document> = self
            .transport
            .execute(Method::POST, &self.version.path("/scrape"), Some(&body), None)
            .await?;

        if !response.success {
            return Err(FirecrawlError::Api(format!(
                "scrape failed: {}",
                response.warning.as_deref().unwrap_or("unknown error")
            )));
        }
        response
            .data
            .ok_or_else(|| FirecrawlError::Api("scrape returned no document".to_string()))
    }
}
