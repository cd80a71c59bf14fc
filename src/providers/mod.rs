//! Search provider implementations.

// Scrape-based, always available
mod duckduckgo;

// Credentialed APIs
mod google;
mod serpapi;

pub use duckduckgo::DuckDuckGo;
pub use google::{GoogleCustomSearch, GOOGLE_API_URL};
pub use serpapi::{SerpApi, SERPAPI_URL};
