//! Shared HTTP client construction.
//!
//! Every outbound request identifies as a generic desktop browser; some
//! endpoints serve a degraded page to anything else.

use std::time::Duration;

use reqwest::Client;

use crate::{Result, SearchConfig, SearchError};

/// User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Builds a [`reqwest::Client`] with the browser User-Agent and the configured timeout.
pub fn build_client(config: &SearchConfig) -> Result<Client> {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}
