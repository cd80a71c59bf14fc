//! # keyword-surprise
//!
//! Answers a keyword with exactly one randomly chosen image or link.
//!
//! Results come from one of a small set of providers:
//!
//! - Google Custom Search, when `GOOGLE_API_KEY` and `GOOGLE_CX` are set
//! - SerpApi, when `SERPAPI_KEY` is set
//! - DuckDuckGo, scraped from its public pages, always available
//!
//! The scrape path degrades to an empty result set when upstream markup
//! changes; only transport and configuration problems surface as errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use keyword_surprise::{Search, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let search = Search::from_config(&SearchConfig::from_env()?)?;
//!
//!     let response = search.search("cats", "image", "auto").await?;
//!     println!("{} found {} results", response.provider, response.count);
//!     if let Some(result) = response.result {
//!         println!("{}", serde_json::to_string_pretty(&result)?);
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod config;
mod error;
mod provider;
mod query;
mod result;
mod search;
mod selector;

pub mod extract;
pub mod http;
pub mod providers;
pub mod token;

pub use aggregator::Aggregator;
pub use config::{Credentials, GoogleCredentials, SearchConfig};
pub use error::{ErrorKind, ErrorResponse, Result, SearchError};
pub use provider::{Provider, ProviderId};
pub use query::{ProviderPreference, ResultKind, SearchQuery};
pub use result::{ImageResult, LinkResult, ResultSet, SearchRecord, SearchResponse};
pub use search::Search;
pub use selector::ProviderSelector;
pub use token::TokenSource;
