//! Search configuration and provider credentials.
//!
//! [`SearchConfig`] is built once by the caller (usually from the process
//! environment) and handed to [`crate::Search`]; nothing in the library reads
//! the environment on its own during a query.

use std::fmt;

use crate::{Result, SearchError};

/// Google Custom Search credentials. Both parts are required.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleCredentials {
    /// API key (`GOOGLE_API_KEY`).
    pub api_key: String,
    /// Programmable Search Engine id (`GOOGLE_CX`).
    pub cx: String,
}

impl GoogleCredentials {
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            cx: cx.into(),
        }
    }
}

impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("api_key", &"***")
            .field("cx", &self.cx)
            .finish()
    }
}

/// Credentials for the API providers. Absent fields mean "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Google Custom Search key and cx.
    pub google: Option<GoogleCredentials>,
    /// SerpApi key (`SERPAPI_KEY`).
    pub serpapi_key: Option<String>,
}

impl Credentials {
    /// No credentials at all; only the scrape provider is usable.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets Google credentials.
    pub fn with_google(mut self, api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        self.google = Some(GoogleCredentials::new(api_key, cx));
        self
    }

    /// Sets the SerpApi key.
    pub fn with_serpapi(mut self, key: impl Into<String>) -> Self {
        self.serpapi_key = Some(key.into());
        self
    }

    /// Reads `GOOGLE_API_KEY`, `GOOGLE_CX` and `SERPAPI_KEY` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup. Blank values
    /// count as absent, and Google needs both the key and the cx.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let google = match (read("GOOGLE_API_KEY"), read("GOOGLE_CX")) {
            (Some(api_key), Some(cx)) => Some(GoogleCredentials { api_key, cx }),
            _ => None,
        };

        Self {
            google,
            serpapi_key: read("SERPAPI_KEY"),
        }
    }

    /// Whether Google Custom Search is usable.
    pub fn has_google(&self) -> bool {
        self.google.is_some()
    }

    /// Whether SerpApi is usable.
    pub fn has_serpapi(&self) -> bool {
        self.serpapi_key.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("google", &self.google)
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Configuration for a [`crate::Search`] instance.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// API provider credentials.
    pub credentials: Credentials,
    /// Per-request timeout in seconds, applied to every outbound call.
    pub timeout_secs: u64,
    /// Locale sent to the DuckDuckGo image endpoint.
    pub locale: String,
}

fn default_timeout() -> u64 {
    8
}

fn default_locale() -> String {
    "us-en".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::none(),
            timeout_secs: default_timeout(),
            locale: default_locale(),
        }
    }
}

impl SearchConfig {
    /// Creates a configuration with the given credentials and default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the image search locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Reads credentials plus the optional `SEARCH_TIMEOUT_SECS` and
    /// `SEARCH_LOCALE` overrides from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`SearchConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(Credentials::from_lookup(&lookup));

        if let Some(raw) = lookup("SEARCH_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                SearchError::Config(format!("SEARCH_TIMEOUT_SECS must be a whole number, got '{raw}'"))
            })?;
        }
        if let Some(locale) = lookup("SEARCH_LOCALE").filter(|v| !v.trim().is_empty()) {
            config.locale = locale.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(SearchError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(SearchError::Config("locale must not be empty".into()));
        }
        Ok(())
    }
}
