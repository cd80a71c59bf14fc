//! Error types for the search library.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The query text was empty after trimming.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The requested provider name is not one of the known providers.
    #[error("Unknown provider '{0}'. Use google|serpapi|duckduckgo|auto.")]
    UnknownProvider(String),

    /// Credentials or other configuration required by a provider are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// Search timeout exceeded.
    #[error("Search timeout exceeded")]
    Timeout,

    /// An API provider answered with a non-success status or an unusable body.
    #[error("{provider} API error: {detail}")]
    Upstream {
        provider: &'static str,
        detail: String,
    },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else {
            SearchError::Http(err.without_url())
        }
    }
}

/// Coarse classification used by the outer boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-correctable input problem. Never retried.
    Validation,
    /// Operator-correctable setup problem, such as missing credentials.
    Configuration,
    /// Network, timeout or upstream failure.
    Transport,
}

impl SearchError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::InvalidQuery(_) | SearchError::UnknownProvider(_) => ErrorKind::Validation,
            SearchError::Config(_) => ErrorKind::Configuration,
            SearchError::Http(_)
            | SearchError::Timeout
            | SearchError::Upstream { .. }
            | SearchError::Parse(_)
            | SearchError::UrlParse(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status code equivalent for this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Configuration | ErrorKind::Transport => 500,
        }
    }
}

/// Outward error body, `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&SearchError> for ErrorResponse {
    fn from(err: &SearchError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
