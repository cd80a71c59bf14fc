//! Session token acquisition for the DuckDuckGo image endpoint.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::Result;

/// Default DuckDuckGo origin.
pub const DUCKDUCKGO_BASE_URL: &str = "https://duckduckgo.com";

/// Source of the per-query token the image endpoint expects.
///
/// `Ok(None)` means the page carried no token; callers continue without one.
/// Only transport failures are errors.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Acquires a fresh token for `query`.
    async fn acquire(&self, query: &str) -> Result<Option<String>>;
}

/// Scrapes the `vqd` token from the DuckDuckGo landing page.
pub struct VqdTokenSource {
    client: Client,
    base_url: String,
}

impl VqdTokenSource {
    /// Creates a token source using `client` against the public site.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DUCKDUCKGO_BASE_URL.to_string(),
        }
    }

    /// Points the token source at a different origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TokenSource for VqdTokenSource {
    async fn acquire(&self, query: &str) -> Result<Option<String>> {
        let url = Url::parse_with_params(&format!("{}/", self.base_url.trim_end_matches('/')), &[("q", query)])?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            debug!("DuckDuckGo landing page returned {}", response.status());
            return Ok(None);
        }
        let body = response.text().await?;

        let token = extract_vqd(&body);
        if token.is_none() {
            debug!("No vqd token in landing page ({} bytes)", body.len());
        }
        Ok(token)
    }
}

static VQD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vqd='([^']+)'").expect("valid regex"));

/// Finds `vqd='...'` in a page body.
pub fn extract_vqd(body: &str) -> Option<String> {
    VQD_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
