//! SerpApi provider (Google results through the SerpApi aggregator).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::http::build_client;
use crate::{
    ImageResult, LinkResult, Provider, ProviderId, Result, ResultKind, ResultSet, SearchConfig,
    SearchError, SearchQuery,
};

/// SerpApi search endpoint.
pub const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// SerpApi provider (single API key).
pub struct SerpApi {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SerpApi {
    /// Creates the provider, failing with [`SearchError::Config`] when no key is configured.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let api_key = config.credentials.serpapi_key.clone().ok_or_else(|| {
            SearchError::Config(ProviderId::SerpApi.missing_credentials_message().to_string())
        })?;
        Ok(Self {
            client: build_client(config)?,
            api_key,
            endpoint: SERPAPI_URL.to_string(),
        })
    }

    /// Overrides the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_url(&self, query: &SearchQuery) -> Result<Url> {
        let mut params = vec![
            ("api_key", self.api_key.as_str()),
            ("q", query.text.as_str()),
            ("engine", "google"),
        ];
        if query.result_type == ResultKind::Image {
            params.push(("tbm", "isch"));
        }
        Ok(Url::parse_with_params(&self.endpoint, &params)?)
    }
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    images_results: Option<Vec<SerpImage>>,
    organic_results: Option<Vec<SerpOrganic>>,
}

#[derive(Debug, Deserialize)]
struct SerpImage {
    title: Option<String>,
    original: Option<String>,
    source: Option<String>,
    thumbnail: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpOrganic {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[async_trait]
impl Provider for SerpApi {
    fn id(&self) -> ProviderId {
        ProviderId::SerpApi
    }

    async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        let url = self.request_url(query)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("SerpApi returned {}: {}", status, body);
            return Err(SearchError::Upstream {
                provider: self.name(),
                detail: format!("status {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        let parsed: SerpResponse = serde_json::from_str(&body).map_err(|e| SearchError::Upstream {
            provider: self.name(),
            detail: format!("malformed response body: {e}"),
        })?;

        Ok(map_response(parsed, query.result_type))
    }
}

fn map_response(response: SerpResponse, kind: ResultKind) -> ResultSet {
    match kind {
        ResultKind::Image => ResultSet::Images(
            response
                .images_results
                .unwrap_or_default()
                .into_iter()
                .map(|item| {
                    ImageResult::new(item.title)
                        .with_source(item.original.or(item.source))
                        .with_thumbnail(item.thumbnail)
                        .with_context(item.link)
                })
                .collect(),
        ),
        ResultKind::Link => ResultSet::Links(
            response
                .organic_results
                .unwrap_or_default()
                .into_iter()
                .filter_map(|item| {
                    LinkResult::new(item.title.unwrap_or_default(), item.link.unwrap_or_default(), item.snippet)
                })
                .collect(),
        ),
    }
}
