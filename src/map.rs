//! Map operation (site link discovery) and link normalization.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FirecrawlError, Result};
use crate::types::{body_with_url, validate_url, MapParams};
use crate::FirecrawlClient;

/// Response from a map request.
#[derive(Debug, Clone, Deserialize)]
pub struct MapResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    links: Value,
}

impl MapResponse {
    /// Discovered links as a flat list of URLs, whatever shape the service
    /// returned them in. Order is preserved; duplicates are kept.
    pub fn links(&self) -> Vec<String> {
        normalize_links(&self.links)
    }
}

impl FirecrawlClient {
    /// Discover the links reachable from a site.
    pub async fn map_url(&self, url: &str, params: &MapParams) -> Result<MapResponse> {
        validate_url(url)?;
        let body = body_with_url(url, params)?;
        debug!(url, "issuing map request");
        let response: MapResponse = self
            .transport
            .execute(Method::POST, &self.version.path("/map"), Some(&body), None)
            .await?;

        if !response.success {
            return Err(FirecrawlError::Api(format!(
                "map failed: {}",
                response.warning.as_deref().unwrap_or("unknown error")
            )));
        }
        Ok(response)
    }
}

/// Canonicalize a `links` value: absent → empty, single string/object →
/// one entry, array → one entry per element with nulls skipped. Objects
/// contribute their `url` field, else `href`, else their stringified form.
pub(crate) fn normalize_links(links: &Value) -> Vec<String> {
    match links {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(link_entry).collect(),
        Value::String(s) => vec![s.clone()],
        Value::Object(_) => link_entry(links).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn link_entry(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("url")
                .and_then(Value::as_str)
                .or_else(|| obj.get("href").and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_mixed_entries_in_order() {
        let links = normalize_links(&json!([
            "https://a.com",
            { "href": "https://b.com" },
            { "bogus": 1 }
        ]));
        assert_eq!(links, ["https://a.com", "https://b.com", r#"{"bogus":1}"#]);
    }

    #[test]
    fn url_field_wins_over_href() {
        let links = normalize_links(&json!([
            { "url": "https://u.com", "href": "https://h.com" }
        ]));
        assert_eq!(links, ["https://u.com"]);
    }

    #[test]
    fn skips_nulls_and_keeps_duplicates() {
        let links = normalize_links(&json!([
            "https://a.com", null, "https://a.com"
        ]));
        assert_eq!(links, ["https://a.com", "https://a.com"]);
    }

    #[test]
    fn absent_links_yield_empty_list() {
        assert!(normalize_links(&Value::Null).is_empty());

        let resp: MapResponse =
            serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(resp.links().is_empty());
    }

    #[test]
    fn single_string_and_object_fallbacks() {
        assert_eq!(
            normalize_links(&json!("https://solo.com")),
            ["https://solo.com"]
        );
        assert_eq!(
            normalize_links(&json!({ "href": "https://obj.com" })),
            ["https://obj.com"]
        );
        assert!(normalize_links(&json!(42)).is_empty());
    }
}
