//! Search orchestration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::providers::{DuckDuckGo, GoogleCustomSearch, SerpApi};
use crate::{
    Aggregator, Credentials, Provider, ProviderId, ProviderPreference, ProviderSelector, Result,
    SearchConfig, SearchError, SearchQuery, SearchResponse,
};

/// Answers queries with one random result from the selected provider.
///
/// Holds only immutable state, so one instance can serve concurrent queries.
pub struct Search {
    providers: HashMap<ProviderId, Arc<dyn Provider>>,
    selector: ProviderSelector,
    aggregator: Aggregator,
    timeout: Duration,
}

impl Search {
    /// Creates a search with no providers registered. Auto selection follows
    /// `credentials`; providers are added with [`Search::add_provider`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            providers: HashMap::new(),
            selector: ProviderSelector::new(credentials),
            aggregator: Aggregator::new(),
            timeout: Duration::from_secs(SearchConfig::default().timeout_secs),
        }
    }

    /// Creates a search with the DuckDuckGo scraper plus every API provider
    /// whose credentials are present in `config`.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let mut search = Self::new(config.credentials.clone());
        search.set_timeout(Duration::from_secs(config.timeout_secs));
        search.add_provider(DuckDuckGo::new(config)?);

        if config.credentials.has_google() {
            search.add_provider(GoogleCustomSearch::new(config)?);
        }
        if config.credentials.has_serpapi() {
            search.add_provider(SerpApi::new(config)?);
        }

        info!(
            "Search ready with {} providers (auto -> {})",
            search.provider_count(),
            search.selector.resolve(ProviderPreference::Auto)
        );
        Ok(search)
    }

    /// Registers a provider, replacing any previous one with the same id.
    pub fn add_provider<P: Provider + 'static>(&mut self, provider: P) {
        self.providers.insert(provider.id(), Arc::new(provider));
    }

    /// Sets the overall timeout for one provider call.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Returns the number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns the provider selector.
    pub fn selector(&self) -> &ProviderSelector {
        &self.selector
    }

    /// Boundary entry point: validates raw parameters, then answers the query.
    ///
    /// `result_type` is `"image"` or `"link"`; `provider` is `"auto"` or a
    /// provider name.
    pub async fn search(&self, text: &str, result_type: &str, provider: &str) -> Result<SearchResponse> {
        let query = SearchQuery::from_params(text, Some(result_type), Some(provider))?;
        self.handle(query).await
    }

    /// Answers a validated query.
    pub async fn handle(&self, query: SearchQuery) -> Result<SearchResponse> {
        let id = self.selector.resolve(query.provider);
        let provider = self.providers.get(&id).ok_or_else(|| {
            SearchError::Config(id.missing_credentials_message().to_string())
        })?;

        let start = Instant::now();
        debug!("Searching {} for {} results", provider.name(), query.result_type);

        let results = match timeout(self.timeout, provider.search(&query)).await {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!("Provider {} failed: {}", provider.name(), e);
                return Err(e);
            }
            Err(_) => {
                warn!("Provider {} timed out", provider.name());
                return Err(SearchError::Timeout);
            }
        };

        debug!(
            "Provider {} returned {} results in {}ms",
            provider.name(),
            results.len(),
            start.elapsed().as_millis()
        );

        Ok(self.aggregator.respond(id, query.result_type, results))
    }
}
