// ---------------------------------------------------------------------------
// Remote advisory search
// ---------------------------------------------------------------------------
//
// Queries a vulnerability-identifier search service with a fingerprint as
// free text. Only identifiers are returned; whether a definition exists for
// them is decided by the local store.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::SourceError;

/// Default identifier search endpoint. The keyword is appended as a path
/// segment.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://cve.circl.lu/api/search/";

/// Responses above this size are rejected rather than parsed.
const MAX_BODY_BYTES: usize = 20_000_000;

/// A free-text vulnerability identifier search.
#[async_trait]
pub trait AdvisorySearch: Send + Sync {
    /// Return identifiers for `keyword`, most relevant first.
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SourceError>;
}

/// HTTP client for a CIRCL-style `/api/search/<keyword>` endpoint.
pub struct CirclSearch {
    client: reqwest::Client,
    endpoint: Url,
    max_results: usize,
}

impl CirclSearch {
    pub fn new(endpoint: &str, max_results: usize, timeout: Duration) -> Result<Self, SourceError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SourceError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(SourceError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pocmap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            max_results,
        })
    }

    /// Build the request URL for `keyword`, percent-encoding it as a single
    /// path segment.
    pub fn search_url(&self, keyword: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(keyword);
        }
        url
    }
}

#[async_trait]
impl AdvisorySearch for CirclSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<String>, SourceError> {
        let url = self.search_url(keyword);
        debug!(%url, "querying advisory search");

        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let body = resp.bytes().await?;
        if body.len() > MAX_BODY_BYTES {
            return Err(SourceError::InvalidEndpoint(format!(
                "response too large ({} bytes)",
                body.len()
            )));
        }
        parse_search_body(&body, self.max_results)
    }
}

/// Search backend used when the remote source is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSearch;

#[async_trait]
impl AdvisorySearch for OfflineSearch {
    async fn search(&self, _keyword: &str) -> Result<Vec<String>, SourceError> {
        Ok(Vec::new())
    }
}

/// Extract `data[].id` from a search response, keeping the service's order.
/// Only the first `max_results` ids are considered; empty ones among them
/// are dropped rather than replaced by later entries.
pub fn parse_search_body(body: &[u8], max_results: usize) -> Result<Vec<String>, SourceError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;

    let ids = value
        .get("data")
        .and_then(|d| d.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("id").and_then(|v| v.as_str()))
                .take(max_results)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(ids)
}
