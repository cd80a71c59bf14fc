//! Search result types.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ProviderId, ResultKind};

/// A single image result. Every field is best effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Image title.
    pub title: Option<String>,
    /// Full-size image URL.
    #[serde(rename = "source")]
    pub source_url: Option<String>,
    /// Thumbnail URL.
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: Option<String>,
    /// Page the image appears on.
    #[serde(rename = "url")]
    pub context_url: Option<String>,
}

impl ImageResult {
    /// Creates an image result with only a title.
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    /// Sets the full-size image URL.
    pub fn with_source(mut self, source_url: Option<String>) -> Self {
        self.source_url = source_url;
        self
    }

    /// Sets the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }

    /// Sets the context page URL.
    pub fn with_context(mut self, context_url: Option<String>) -> Self {
        self.context_url = context_url;
        self
    }
}

/// A single link result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResult {
    /// Result title. Never empty.
    pub title: String,
    /// Destination URL. Never empty.
    pub link: String,
    /// Result description, when the source had one.
    pub snippet: Option<String>,
}

impl LinkResult {
    /// Creates a link result, or `None` when the title or link is blank.
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: Option<String>) -> Option<Self> {
        let title = title.into();
        let link = link.into();
        if title.trim().is_empty() || link.trim().is_empty() {
            return None;
        }
        Some(Self { title, link, snippet })
    }

    /// Snippet text, empty when there is none.
    pub fn snippet_text(&self) -> &str {
        self.snippet.as_deref().unwrap_or_default()
    }
}

/// A normalized record from any provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
// Link is listed first: untagged deserialization tries variants in order and
// every ImageResult field is optional.
#[serde(untagged)]
pub enum SearchRecord {
    Link(LinkResult),
    Image(ImageResult),
}

/// Ordered results of one provider call. All records share one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSet {
    Images(Vec<ImageResult>),
    Links(Vec<LinkResult>),
}

impl ResultSet {
    /// An empty set of the given shape.
    pub fn empty(kind: ResultKind) -> Self {
        match kind {
            ResultKind::Image => ResultSet::Images(Vec::new()),
            ResultKind::Link => ResultSet::Links(Vec::new()),
        }
    }

    /// The record shape held by this set.
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultSet::Images(_) => ResultKind::Image,
            ResultSet::Links(_) => ResultKind::Link,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Images(items) => items.len(),
            ResultSet::Links(items) => items.len(),
        }
    }

    /// Returns true when there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record at `index`.
    pub fn get(&self, index: usize) -> Option<SearchRecord> {
        match self {
            ResultSet::Images(items) => items.get(index).cloned().map(SearchRecord::Image),
            ResultSet::Links(items) => items.get(index).cloned().map(SearchRecord::Link),
        }
    }

    /// Picks one record uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SearchRecord> {
        if self.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.len()))
    }

    /// Converts into a flat list of records.
    pub fn into_records(self) -> Vec<SearchRecord> {
        match self {
            ResultSet::Images(items) => items.into_iter().map(SearchRecord::Image).collect(),
            ResultSet::Links(items) => items.into_iter().map(SearchRecord::Link).collect(),
        }
    }
}

/// The outward answer for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Provider that answered.
    pub provider: ProviderId,
    /// Requested result shape.
    #[serde(rename = "type")]
    pub result_type: ResultKind,
    /// Number of records the provider returned.
    pub count: usize,
    /// The randomly chosen record, if any.
    pub result: Option<SearchRecord>,
}
