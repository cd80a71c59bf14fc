//! DuckDuckGo scrape provider.
//!
//! Images come from the `i.js` JSON endpoint, which wants a `vqd` token
//! scraped from the landing page first. Links come from the HTML-only
//! results page. Neither path needs credentials.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::extract::{extract_images, extract_links};
use crate::http::build_client;
use crate::token::{TokenSource, VqdTokenSource, DUCKDUCKGO_BASE_URL};
use crate::{Provider, ProviderId, Result, ResultKind, ResultSet, SearchConfig, SearchQuery};

/// DuckDuckGo provider.
pub struct DuckDuckGo {
    client: Client,
    tokens: Arc<dyn TokenSource>,
    base_url: String,
    locale: String,
}

impl DuckDuckGo {
    /// Creates a DuckDuckGo provider from configuration.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = build_client(config)?;
        Ok(Self {
            tokens: Arc::new(VqdTokenSource::new(client.clone())),
            client,
            base_url: DUCKDUCKGO_BASE_URL.to_string(),
            locale: config.locale.clone(),
        })
    }

    /// Replaces the token source.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Points both endpoints, and the default token source, at a different origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.tokens = Arc::new(VqdTokenSource::new(self.client.clone()).with_base_url(base_url.clone()));
        self.base_url = base_url;
        self
    }

    async fn search_images(&self, text: &str) -> Result<ResultSet> {
        let token = self.tokens.acquire(text).await?;
        if token.is_none() {
            debug!("Searching DuckDuckGo images without a vqd token");
        }

        let url = image_url(&self.base_url, text, &self.locale, token.as_deref())?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("DuckDuckGo image endpoint returned {}", status);
            return Ok(ResultSet::empty(ResultKind::Image));
        }

        let body = response.text().await?;
        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("DuckDuckGo image payload is not JSON: {}", e);
                return Ok(ResultSet::empty(ResultKind::Image));
            }
        };

        Ok(ResultSet::Images(extract_images(&payload)))
    }

    async fn search_links(&self, text: &str) -> Result<ResultSet> {
        let url = Url::parse_with_params(&format!("{}/html/", self.base_url), &[("q", text)])?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("DuckDuckGo results page returned {}", status);
            return Ok(ResultSet::empty(ResultKind::Link));
        }

        let html = response.text().await?;
        Ok(ResultSet::Links(extract_links(&html)))
    }
}

#[async_trait]
impl Provider for DuckDuckGo {
    fn id(&self) -> ProviderId {
        ProviderId::DuckDuckGo
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        match query.result_type {
            ResultKind::Image => self.search_images(&query.text).await,
            ResultKind::Link => self.search_links(&query.text).await,
        }
    }
}

/// Builds the `i.js` URL; `vqd` is only sent when a token was found.
fn image_url(base_url: &str, text: &str, locale: &str, token: Option<&str>) -> Result<Url> {
    let mut params = vec![("q", text), ("l", locale)];
    if let Some(token) = token {
        params.push(("vqd", token));
    }
    Ok(Url::parse_with_params(&format!("{base_url}/i.js"), &params)?)
}
