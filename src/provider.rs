//! Search provider trait and identities.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, ResultSet, SearchError, SearchQuery};

/// The closed set of providers a query can be answered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Scrapes DuckDuckGo's public pages. Needs no credentials.
    DuckDuckGo,
    /// Google Custom Search JSON API (quota key + search engine id).
    Google,
    /// SerpApi aggregator (single API key).
    SerpApi,
}

impl ProviderId {
    /// Every provider, in auto-selection priority order (API providers first).
    pub const ALL: [ProviderId; 3] = [ProviderId::Google, ProviderId::SerpApi, ProviderId::DuckDuckGo];

    /// Wire name, as accepted by the `provider` parameter and echoed in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::DuckDuckGo => "duckduckgo",
            ProviderId::Google => "google",
            ProviderId::SerpApi => "serpapi",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::DuckDuckGo => "DuckDuckGo",
            ProviderId::Google => "Google",
            ProviderId::SerpApi => "SerpApi",
        }
    }

    /// Whether this provider needs API credentials.
    pub fn requires_credentials(&self) -> bool {
        !matches!(self, ProviderId::DuckDuckGo)
    }

    /// Message used when the provider is requested but its credentials are absent.
    pub fn missing_credentials_message(&self) -> &'static str {
        match self {
            ProviderId::DuckDuckGo => "DuckDuckGo provider is not registered.",
            ProviderId::Google => "Google API key (GOOGLE_API_KEY) or CX (GOOGLE_CX) missing.",
            ProviderId::SerpApi => "SERPAPI_KEY missing.",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "duckduckgo" | "ddg" => Ok(ProviderId::DuckDuckGo),
            "google" => Ok(ProviderId::Google),
            "serpapi" => Ok(ProviderId::SerpApi),
            _ => Err(SearchError::UnknownProvider(s.to_string())),
        }
    }
}

/// Trait for implementing search providers.
///
/// A provider answers one query with a result set whose shape matches the
/// query's result type. "Nothing usable" is an empty set, not an error.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider identity.
    fn id(&self) -> ProviderId;

    /// Performs a search and returns the normalized results.
    async fn search(&self, query: &SearchQuery) -> Result<ResultSet>;

    /// Returns the provider name.
    fn name(&self) -> &'static str {
        self.id().display_name()
    }
}
