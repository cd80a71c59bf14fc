//! Google Custom Search JSON API provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::config::GoogleCredentials;
use crate::http::build_client;
use crate::{
    ImageResult, LinkResult, Provider, ProviderId, Result, ResultKind, ResultSet, SearchConfig,
    SearchError, SearchQuery,
};

/// Google Custom Search API endpoint.
pub const GOOGLE_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Custom Search provider (quota key + search engine id).
pub struct GoogleCustomSearch {
    client: Client,
    credentials: GoogleCredentials,
    endpoint: String,
}

impl GoogleCustomSearch {
    /// Creates the provider, failing with [`SearchError::Config`] when the
    /// key or cx is not configured.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let credentials = config.credentials.google.clone().ok_or_else(|| {
            SearchError::Config(ProviderId::Google.missing_credentials_message().to_string())
        })?;
        Ok(Self {
            client: build_client(config)?,
            credentials,
            endpoint: GOOGLE_API_URL.to_string(),
        })
    }

    /// Overrides the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_url(&self, query: &SearchQuery) -> Result<Url> {
        let mut params = vec![
            ("key", self.credentials.api_key.as_str()),
            ("cx", self.credentials.cx.as_str()),
            ("q", query.text.as_str()),
        ];
        if query.result_type == ResultKind::Image {
            params.push(("searchType", "image"));
        }
        Ok(Url::parse_with_params(&self.endpoint, &params)?)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    items: Option<Vec<GoogleItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    image: Option<GoogleImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleImage {
    thumbnail_link: Option<String>,
    context_link: Option<String>,
}

#[async_trait]
impl Provider for GoogleCustomSearch {
    fn id(&self) -> ProviderId {
        ProviderId::Google
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        let url = self.request_url(query)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Google API returned {}: {}", status, body);
            return Err(SearchError::Upstream {
                provider: self.name(),
                detail: format!("status {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        let parsed: GoogleResponse = serde_json::from_str(&body).map_err(|e| SearchError::Upstream {
            provider: self.name(),
            detail: format!("malformed response body: {e}"),
        })?;

        Ok(map_items(parsed.items.unwrap_or_default(), query.result_type))
    }
}

fn map_items(items: Vec<GoogleItem>, kind: ResultKind) -> ResultSet {
    match kind {
        ResultKind::Image => ResultSet::Images(
            items
                .into_iter()
                .map(|item| {
                    let (thumbnail, context) = item
                        .image
                        .map(|image| (image.thumbnail_link, image.context_link))
                        .unwrap_or_default();
                    ImageResult::new(item.title)
                        .with_source(item.link)
                        .with_thumbnail(thumbnail)
                        .with_context(context)
                })
                .collect(),
        ),
        ResultKind::Link => ResultSet::Links(
            items
                .into_iter()
                .filter_map(|item| {
                    LinkResult::new(item.title.unwrap_or_default(), item.link.unwrap_or_default(), item.snippet)
                })
                .collect(),
        ),
    }
}
