//! Search query representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ProviderId, Result, SearchError};

/// The shape of result a query asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    /// An image (source, thumbnail, page it appears on).
    #[default]
    Image,
    /// A web link (title, URL, snippet).
    Link,
}

impl ResultKind {
    /// Parses the `type` parameter leniently: `"link"` selects links,
    /// anything else (including nothing) selects images.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(|p| p.trim().to_lowercase()) {
            Some(p) if p == "link" => ResultKind::Link,
            _ => ResultKind::Image,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Image => "image",
            ResultKind::Link => "link",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which provider should answer a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderPreference {
    /// Let the selector pick based on available credentials.
    #[default]
    Auto,
    /// Use this provider.
    Named(ProviderId),
}

impl FromStr for ProviderPreference {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ProviderPreference::Auto);
        }
        trimmed.parse().map(ProviderPreference::Named)
    }
}

/// A validated search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The search terms, trimmed and non-empty.
    pub text: String,
    /// Requested result shape.
    pub result_type: ResultKind,
    /// Requested provider.
    pub provider: ProviderPreference,
}

impl SearchQuery {
    /// Creates a query for the given terms, rejecting blank text.
    pub fn new(text: impl AsRef<str>, result_type: ResultKind) -> Result<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(SearchError::InvalidQuery(
                "Missing query parameter 'q'.".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
            result_type,
            provider: ProviderPreference::Auto,
        })
    }

    /// Builds a query from raw boundary parameters, in the order the
    /// parameters are checked: text, then type, then provider.
    pub fn from_params(text: &str, result_type: Option<&str>, provider: Option<&str>) -> Result<Self> {
        let query = Self::new(text, ResultKind::from_param(result_type))?;
        let provider = provider.unwrap_or("auto").parse()?;
        Ok(query.with_provider(provider))
    }

    /// Sets the provider preference.
    pub fn with_provider(mut self, provider: ProviderPreference) -> Self {
        self.provider = provider;
        self
    }
}
