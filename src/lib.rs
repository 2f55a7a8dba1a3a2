//! Pure Firecrawl REST API client.
//!
//! A minimal client for the Firecrawl content-extraction API. Supports
//! keyword search, single-page scraping, site link discovery ("map"), and
//! asynchronous crawl jobs with polling.
//!
//! # Example
//!
//! ```rust,ignore
//! use firecrawl_client::{CrawlParams, FirecrawlClient, SearchParams};
//!
//! let client = FirecrawlClient::from_env()?;
//!
//! // Search
//! let response = client.search(&SearchParams::new("example domain")).await?;
//! for result in response.results() {
//!     println!("{} -> {}", result.title().unwrap_or("(untitled)"),
//!              result.url().unwrap_or("(no url)"));
//! }
//!
//! // Crawl end-to-end: start the job and poll until it finishes
//! let status = client
//!     .crawl("https://example.com", &CrawlParams::default(), None)
//!     .await?;
//! println!("{} documents", status.data.len());
//! ```

pub mod crawl;
pub mod error;
pub mod map;
pub mod scrape;
pub mod search;
pub mod types;

mod http;

pub use crawl::{CancelStatus, CrawlJob, CrawlStatus};
pub use error::{FirecrawlError, Result};
pub use map::MapResponse;
pub use search::{ResultMetadata, SearchResponse, SearchResult};
pub use types::{
    ApiVersion, CrawlParams, Document, MapParams, ScrapeOptions, SearchParams, SitemapMode,
};

use std::time::Duration;

use http::Transport;

const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Firecrawl API client.
///
/// Configuration is fixed at construction; operations take `&self`, are
/// stateless, and share only the underlying connection pool, so a client
/// can be cloned and used from concurrent tasks freely.
#[derive(Clone)]
pub struct FirecrawlClient {
    transport: Transport,
    version: ApiVersion,
    poll_interval: Duration,
}

impl FirecrawlClient {
    /// Create a client with the given API key and default settings
    /// (public endpoint, v2 API, 120 s request timeout).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::build(api_key.into(), DEFAULT_BASE_URL.to_string())
    }

    /// Create a client from `FIRECRAWL_API_KEY` and, when set,
    /// `FIRECRAWL_API_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FIRECRAWL_API_KEY")
            .map_err(|_| FirecrawlError::Config("FIRECRAWL_API_KEY not set".to_string()))?;
        let base_url = std::env::var("FIRECRAWL_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::build(api_key, base_url)
    }

    fn build(api_key: String, base_url: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FirecrawlError::Config(
                "API key must not be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FirecrawlError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            transport: Transport::new(client, base_url, api_key),
            version: ApiVersion::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Point the client at a different endpoint (self-hosted instance,
    /// test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.transport.base_url = url.into();
        self
    }

    /// Target a specific API version (default v2).
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the overall per-request timeout (default 120 s). Rebuilds the
    /// underlying HTTP client.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FirecrawlError::Config(format!("failed to build HTTP client: {e}")))?;
        self.transport.set_client(client);
        Ok(self)
    }

    /// Set the default interval between crawl status polls (default 2 s).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        match FirecrawlClient::new("") {
            Err(FirecrawlError::Config(msg)) => assert!(msg.contains("API key")),
            other => panic!("expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn builder_methods_apply() {
        let client = FirecrawlClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:3002")
            .with_api_version(ApiVersion::V1)
            .with_poll_interval(Duration::from_millis(50));
        assert_eq!(client.base_url(), "http://localhost:3002");
        assert_eq!(client.version, ApiVersion::V1);
        assert_eq!(client.poll_interval, Duration::from_millis(50));
    }
}
