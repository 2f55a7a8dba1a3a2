//! Search operation and result-shape normalization.
//!
//! The `data` field of a search response arrives in many shapes depending
//! on the API version and the upstream search provider: a bare array, a
//! `results`/`items`/`organic_results` container, Bing-style
//! `webPages.value`, or v2 source maps (`web`/`news`/`images`). Everything
//! is normalized into canonical [`SearchResult`] records through a staged
//! parse over a `serde_json::Value` tree.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::types::{request_body, SearchParams};
use crate::FirecrawlClient;

const TITLE_KEYS: [&str; 3] = ["title", "name", "headline"];
const DESCRIPTION_KEYS: [&str; 3] = ["description", "snippet", "summary"];
const URL_KEYS: [&str; 5] = ["url", "link", "href", "sourceURL", "permalink"];
const CONTENT_KEYS: [&str; 4] = ["content", "page", "document", "doc"];

/// Response from a search request.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    data: Value,
}

impl SearchResponse {
    /// The search results, normalized into canonical records regardless of
    /// the wire shape. Never fails: unrecognized shapes yield an empty
    /// list and malformed individual entries are dropped.
    pub fn results(&self) -> Vec<SearchResult> {
        normalize_results(&self.data)
    }
}

/// A single, canonical search result record.
///
/// Accessors apply a fallback chain over explicit fields, normalized
/// metadata, and content-derived values; they are pure functions of the
/// record and safe to call repeatedly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    markdown: Option<String>,
    html: Option<String>,
    raw_html: Option<String>,
    links: Vec<String>,
    screenshot: Option<String>,
    metadata: ResultMetadata,
}

/// Metadata attached to a search result, normalized from whatever the
/// provider supplied (or synthesized from resolved fields when absent).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub status_code: Option<i64>,
    pub error: Option<String>,
}

impl SearchResult {
    /// Title: explicit field, then metadata, then the first non-empty
    /// markdown line with leading heading markers stripped.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.metadata.title.as_deref()))
            .or_else(|| self.title_from_markdown())
    }

    /// Description: explicit field, then metadata, then the second
    /// non-empty markdown line (the first is taken as the title).
    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
            .or_else(|| non_empty(self.metadata.description.as_deref()))
            .or_else(|| self.description_from_markdown())
    }

    /// URL: explicit field, then metadata source URL, then the first
    /// absolute http(s) entry in the links list.
    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
            .or_else(|| non_empty(self.metadata.source_url.as_deref()))
            .or_else(|| {
                self.links
                    .iter()
                    .map(String::as_str)
                    .find(|l| looks_like_url(l))
            })
    }

    pub fn markdown(&self) -> Option<&str> {
        self.markdown.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn raw_html(&self) -> Option<&str> {
        self.raw_html.as_deref()
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Base64-encoded screenshot, when the provider captured one.
    pub fn screenshot(&self) -> Option<&str> {
        self.screenshot.as_deref()
    }

    pub fn metadata(&self) -> &ResultMetadata {
        &self.metadata
    }

    fn title_from_markdown(&self) -> Option<&str> {
        let markdown = non_empty(self.markdown.as_deref())?;
        let line = markdown.lines().map(str::trim).find(|l| !l.is_empty())?;
        let stripped = line.trim_start_matches('#').trim();
        (!stripped.is_empty()).then_some(stripped)
    }

    fn description_from_markdown(&self) -> Option<&str> {
        let markdown = non_empty(self.markdown.as_deref())?;
        markdown
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .nth(1)
    }
}

impl FirecrawlClient {
    /// Run a keyword search.
    ///
    /// Results come back through [`SearchResponse::results`], normalized
    /// into canonical records whatever shape the service returned.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        params.validate()?;
        let body = request_body(params)?;
        debug!(query = %params.query, "issuing search request");
        self.transport
            .execute(Method::POST, &self.version.path("/search"), Some(&body), None)
            .await
    }
}

/// Locate the result array inside an arbitrary `data` value and normalize
/// every element, preserving input order. Non-object entries are skipped.
pub(crate) fn normalize_results(data: &Value) -> Vec<SearchResult> {
    match data {
        Value::Array(items) => normalize_array(items),
        Value::Object(obj) => match locate_results(obj) {
            Some(items) => normalize_array(items),
            // No recognizable container: treat the object as one result.
            None => vec![normalize_item(obj)],
        },
        _ => Vec::new(),
    }
}

/// Priority-ordered shape detection, first match wins.
fn locate_results(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    if let Some(arr) = array_field(obj, "results") {
        return Some(arr);
    }
    match obj.get("data") {
        Some(Value::Array(arr)) => return Some(arr),
        Some(Value::Object(data)) => {
            for key in ["results", "items", "organic_results"] {
                if let Some(arr) = array_field(data, key) {
                    return Some(arr);
                }
            }
            if let Some(arr) = web_pages_value(data) {
                return Some(arr);
            }
            if let Some(arr) = array_field(data, "value") {
                return Some(arr);
            }
            if let Some(arr) = source_results(data) {
                return Some(arr);
            }
        }
        _ => {}
    }
    for key in ["organic_results", "items"] {
        if let Some(arr) = array_field(obj, key) {
            return Some(arr);
        }
    }
    if let Some(arr) = web_pages_value(obj) {
        return Some(arr);
    }
    if let Some(arr) = array_field(obj, "value") {
        return Some(arr);
    }
    source_results(obj)
}

/// v2 source maps: `web`/`news`/`images`, each either a result array or a
/// nested container exposing the usual sub-keys.
fn source_results(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    for key in ["web", "news", "images"] {
        match obj.get(key) {
            Some(Value::Array(arr)) => return Some(arr),
            Some(Value::Object(source)) => {
                for sub in ["results", "organic_results", "items", "value"] {
                    if let Some(arr) = array_field(source, sub) {
                        return Some(arr);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn web_pages_value(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    match obj.get("webPages") {
        Some(Value::Object(web_pages)) => array_field(web_pages, "value"),
        _ => None,
    }
}

fn array_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    obj.get(key).and_then(Value::as_array)
}

fn normalize_array(items: &[Value]) -> Vec<SearchResult> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(normalize_item)
        .collect()
}

/// Canonicalize one raw result item: pick title/description/url from their
/// first-present aliases, pull content fields out of a nested container
/// (or the item itself), and normalize or synthesize metadata.
fn normalize_item(item: &Map<String, Value>) -> SearchResult {
    let mut metadata = match item.get("metadata") {
        Some(Value::Object(raw)) => Some(normalize_metadata(raw)),
        _ => None,
    };
    let mut title = metadata.as_ref().and_then(|m| m.title.clone());
    let mut description = metadata.as_ref().and_then(|m| m.description.clone());
    let mut url = metadata.as_ref().and_then(|m| m.source_url.clone());

    // Explicit top-level values win over metadata.
    if let Some(t) = first_string(item, &TITLE_KEYS) {
        title = Some(t);
    }
    if let Some(d) = first_string(item, &DESCRIPTION_KEYS) {
        description = Some(d);
    }
    if let Some(u) = first_string(item, &URL_KEYS) {
        url = Some(u);
    }

    let mut content = first_object(item, &CONTENT_KEYS);
    if content.is_none() {
        // Some shapes nest the item one level down under `data`.
        if let Some(Value::Object(data)) = item.get("data") {
            content = first_object(data, &CONTENT_KEYS);
            if title.is_none() {
                title = first_string(data, &TITLE_KEYS);
            }
            if description.is_none() {
                description = first_string(data, &DESCRIPTION_KEYS);
            }
            if url.is_none() {
                url = first_string(data, &URL_KEYS);
            }
            if metadata.is_none() {
                if let Some(Value::Object(raw)) = data.get("metadata") {
                    metadata = Some(normalize_metadata(raw));
                }
            }
        }
    }

    let mut result = SearchResult {
        title,
        description,
        url,
        ..SearchResult::default()
    };

    let fields = content.unwrap_or(item);
    result.markdown = if content.is_some() {
        first_string(fields, &["markdown", "md", "text", "content"])
    } else {
        first_string(fields, &["markdown", "md", "text"])
    };
    result.html = first_string(fields, &["html"]);
    result.raw_html = first_string(fields, &["rawHtml", "raw_html"]);
    result.links = string_array(fields, "links");
    result.screenshot = fields
        .get("screenshot")
        .and_then(Value::as_str)
        .map(str::to_string);

    result.metadata = metadata.unwrap_or_else(|| ResultMetadata {
        title: result.title.clone(),
        description: result.description.clone(),
        source_url: result.url.clone(),
        status_code: None,
        error: None,
    });

    result
}

/// Collapse the many metadata spellings providers use into one shape.
fn normalize_metadata(raw: &Map<String, Value>) -> ResultMetadata {
    ResultMetadata {
        title: first_string(
            raw,
            &["title", "pageTitle", "ogTitle", "twitterTitle", "name", "headline"],
        ),
        description: first_string(
            raw,
            &[
                "description",
                "metaDescription",
                "ogDescription",
                "twitterDescription",
                "snippet",
                "summary",
            ],
        ),
        source_url: first_string(
            raw,
            &[
                "sourceURL",
                "sourceUrl",
                "url",
                "link",
                "href",
                "permalink",
                "resolvedUrl",
                "canonical",
            ],
        ),
        status_code: first_int(raw, &["statusCode", "status_code", "status"]),
        error: first_string(raw, &["error", "err", "message", "warning", "detail"]),
    }
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn first_int(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match obj.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Some(i);
                }
            }
            Some(Value::String(s)) => {
                let digits: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '-')
                    .collect();
                if let Ok(i) = digits.parse() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn first_object<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Map<String, Value>> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_object))
}

fn string_array(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: Value) -> SearchResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn parses_top_level_array() {
        let resp = parse(json!({
            "success": true,
            "data": [ { "title": "A", "url": "https://a.com" } ]
        }));
        assert!(resp.success);
        let results = resp.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("A"));
    }

    #[test]
    fn parses_object_with_results_array() {
        let resp = parse(json!({
            "data": { "results": [ { "title": "B", "url": "https://b.com" } ] }
        }));
        let results = resp.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url(), Some("https://b.com"));
    }

    #[test]
    fn parses_v2_web_array_at_data_level() {
        let resp = parse(json!({
            "data": { "web": [ { "title": "C", "url": "https://c.com" } ] }
        }));
        let results = resp.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("C"));
    }

    #[test]
    fn parses_v2_web_object_with_organic_results() {
        let resp = parse(json!({
            "data": { "web": { "organic_results": [
                { "title": "D", "url": "https://d.com" }
            ] } }
        }));
        let results = resp.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("D"));
        assert_eq!(results[0].url(), Some("https://d.com"));
    }

    #[test]
    fn parses_bing_style_web_pages() {
        let results = normalize_results(&json!({
            "webPages": { "value": [ { "name": "E", "url": "https://e.com" } ] }
        }));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("E"));
    }

    #[test]
    fn fallback_single_object_normalization() {
        let resp = parse(json!({
            "data": { "title": "F", "url": "https://f.com" }
        }));
        let results = resp.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("F"));
        assert_eq!(results[0].url(), Some("https://f.com"));
    }

    #[test]
    fn handles_null_or_missing_data() {
        let resp = parse(json!({ "success": true, "data": null }));
        assert!(resp.results().is_empty());

        let resp = parse(json!({ "success": true }));
        assert!(resp.results().is_empty());
    }

    #[test]
    fn preserves_order_and_skips_non_objects() {
        let results = normalize_results(&json!([
            { "title": "one" },
            "junk",
            42,
            { "title": "two" },
            null,
            { "title": "three" }
        ]));
        let titles: Vec<_> = results.iter().filter_map(SearchResult::title).collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[test]
    fn results_container_wins_over_data_array() {
        let results = normalize_results(&json!({
            "results": [ { "title": "from results" } ],
            "data": [ { "title": "from data" } ]
        }));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), Some("from results"));
    }

    #[test]
    fn extracts_content_from_nested_container() {
        let results = normalize_results(&json!([{
            "title": "G",
            "page": {
                "markdown": "# G\nBody",
                "html": "<h1>G</h1>",
                "raw_html": "<html><h1>G</h1></html>",
                "links": ["https://g.com/a", "https://g.com/b"]
            }
        }]));
        assert_eq!(results[0].markdown(), Some("# G\nBody"));
        assert_eq!(results[0].html(), Some("<h1>G</h1>"));
        assert_eq!(results[0].raw_html(), Some("<html><h1>G</h1></html>"));
        assert_eq!(results[0].links().len(), 2);
    }

    #[test]
    fn title_aliases_and_metadata_fallback() {
        let results = normalize_results(&json!([
            { "name": "via name" },
            { "metadata": { "ogTitle": "via og" } }
        ]));
        assert_eq!(results[0].title(), Some("via name"));
        assert_eq!(results[1].title(), Some("via og"));
    }

    #[test]
    fn derives_title_and_description_from_markdown() {
        let results = normalize_results(&json!([{
            "markdown": "# Heading\nBody line"
        }]));
        let record = &results[0];
        assert_eq!(record.title(), Some("Heading"));
        assert_eq!(record.description(), Some("Body line"));
    }

    #[test]
    fn derives_url_from_links() {
        let results = normalize_results(&json!([{
            "markdown": "plain",
            "links": ["mailto:x@y.z", "HTTPS://example.com/page"]
        }]));
        assert_eq!(results[0].url(), Some("HTTPS://example.com/page"));
    }

    #[test]
    fn derivation_is_idempotent() {
        let results = normalize_results(&json!([{
            "markdown": "# Heading\n\nBody line\nMore",
            "links": ["https://h.com"]
        }]));
        let record = &results[0];
        let first = (record.title(), record.description(), record.url());
        let second = (record.title(), record.description(), record.url());
        assert_eq!(first, second);
        assert_eq!(first, (Some("Heading"), Some("Body line"), Some("https://h.com")));
    }

    #[test]
    fn synthesizes_metadata_when_absent() {
        let results = normalize_results(&json!([
            { "title": "T", "description": "D", "url": "https://t.com" }
        ]));
        let meta = results[0].metadata();
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(meta.description.as_deref(), Some("D"));
        assert_eq!(meta.source_url.as_deref(), Some("https://t.com"));
    }

    #[test]
    fn metadata_status_code_from_string() {
        let results = normalize_results(&json!([
            { "metadata": { "statusCode": 200 } },
            { "metadata": { "status": "HTTP 404" } }
        ]));
        assert_eq!(results[0].metadata().status_code, Some(200));
        assert_eq!(results[1].metadata().status_code, Some(404));
    }

    #[test]
    fn explicit_fields_win_over_metadata() {
        let results = normalize_results(&json!([{
            "title": "explicit",
            "metadata": { "title": "from metadata", "sourceURL": "https://m.com" }
        }]));
        assert_eq!(results[0].title(), Some("explicit"));
        assert_eq!(results[0].url(), Some("https://m.com"));
    }

    #[test]
    fn unrecognized_scalar_data_yields_empty() {
        assert!(normalize_results(&json!("oops")).is_empty());
        assert!(normalize_results(&json!(17)).is_empty());
    }
}
