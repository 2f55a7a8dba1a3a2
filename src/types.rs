//! Parameter and document types for the Firecrawl API.
//!
//! Parameter structs are plain immutable data: optional fields, serde
//! camelCase renames matching the wire format, and `validate()` methods
//! that reject malformed input before any network call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FirecrawlError, Result};

/// Firecrawl API version the client targets. Affects the path prefix and
/// which parameters the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub(crate) fn path(&self, suffix: &str) -> String {
        match self {
            ApiVersion::V1 => format!("/v1{suffix}"),
            ApiVersion::V2 => format!("/v2{suffix}"),
        }
    }
}

/// Parameters for search requests.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Time-based search filter (e.g. `qdr:d`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Timeout in milliseconds for the search on the service side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(
        rename = "ignoreInvalidURLs",
        skip_serializing_if = "Option::is_none"
    )]
    pub ignore_invalid_urls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_options: Option<ScrapeOptions>,
    /// v2 only: which result sources to query (`web`, `news`, `images`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(FirecrawlError::validation("query", "query must not be empty"));
        }
        Ok(())
    }
}

/// Options for scrape requests, also nested as `scrapeOptions` inside
/// search and crawl requests.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    /// Output formats (`markdown`, `html`, `rawHtml`, `links`, `screenshot`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
    /// Extra HTTP headers the service sends when fetching the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_main_content: Option<bool>,
    /// Milliseconds to wait after page load before capturing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<u32>,
    /// v1 name for PDF handling; v2 uses `parsers`.
    #[serde(rename = "parsePDF", skip_serializing_if = "Option::is_none")]
    pub parse_pdf: Option<bool>,
    /// v2 replacement for `parsePDF` (e.g. `["pdf"]`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsers: Option<Vec<String>>,
    /// Timeout in milliseconds for the scrape on the service side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    // v2 additions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_tls_verification: Option<bool>,
    /// Page actions (click, type, wait, ...) as raw JSON objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Value>>,
    /// Geolocation hint, e.g. `{"country": "US"}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_base64_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ads: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_in_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_data_retention: Option<bool>,
}

/// Parameters for map (site link discovery) requests.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_subdomains: Option<bool>,
    /// Filter discovered links by this search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_sitemap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// How the crawler should treat the site's sitemap (v2 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapMode {
    Only,
    Skip,
    Include,
}

/// Parameters for crawl requests.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_options: Option<ScrapeOptions>,
    /// v2 only: natural-language crawl instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_entire_domain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discovery_depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<SitemapMode>,
}

/// A document retrieved by scrape or crawl.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default, rename = "rawHtml", alias = "raw_html")]
    pub raw_html: Option<String>,
    /// Base64-encoded screenshot, when requested.
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, Value>,
}

impl Document {
    /// Text content of the document (alias for the markdown form).
    pub fn text(&self) -> Option<&str> {
        self.markdown.as_deref()
    }
}

/// Shared success/warning envelope around operation payloads.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

pub(crate) fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(FirecrawlError::validation("url", "url must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(FirecrawlError::validation(
            "url",
            format!("url must be absolute http(s), got {url:?}"),
        ));
    }
    Ok(())
}

/// Serialize request parameters to a JSON body.
pub(crate) fn request_body<T: Serialize>(params: &T) -> Result<Value> {
    serde_json::to_value(params)
        .map_err(|e| FirecrawlError::Decode(format!("failed to encode request body: {e}")))
}

/// Serialize request parameters and inject the target `url` field.
pub(crate) fn body_with_url<T: Serialize>(url: &str, params: &T) -> Result<Value> {
    let mut body = request_body(params)?;
    if let Value::Object(map) = &mut body {
        map.insert("url".to_string(), Value::String(url.to_string()));
    }
    Ok(body)
}
