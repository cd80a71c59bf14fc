//! Result extraction from raw provider payloads.
//!
//! Nothing here performs I/O. Link extraction runs an ordered chain of
//! [`LinkStrategy`] implementations and stops at the first one that yields
//! anything, so a markup change upstream degrades the result set instead of
//! failing the request.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ImageResult, LinkResult, Result, SearchError};

/// Path segment of DuckDuckGo's click-through redirect.
const REDIRECT_PATH: &str = "/l/?";
/// Query parameter holding the percent-encoded destination.
const REDIRECT_PARAM: &str = "uddg";

/// Extracts image records from an image-search JSON payload.
///
/// Reads the `results` array. Entries are kept even when every field is
/// missing; a missing or non-array `results` key yields an empty list.
pub fn extract_images(payload: &Value) -> Vec<ImageResult> {
    let Some(entries) = payload.get("results").and_then(Value::as_array) else {
        debug!("Image payload has no results array");
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            ImageResult::new(field(entry, "title"))
                .with_source(field(entry, "image").or_else(|| field(entry, "original")))
                .with_thumbnail(field(entry, "thumbnail"))
                .with_context(field(entry, "url").or_else(|| field(entry, "source")))
        })
        .collect()
}

/// Non-empty string field of a JSON object.
fn field(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extracts link records from a DuckDuckGo HTML results page using the
/// default strategy chain.
pub fn extract_links(markup: &str) -> Vec<LinkResult> {
    LinkExtractor::default().extract(markup)
}

/// One way of pulling link records out of a results document.
pub trait LinkStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts records in document order.
    fn extract(&self, document: &Html) -> Result<Vec<LinkResult>>;
}

/// Strict pass: one record per `.result__body` block, with snippet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultBlocks;

impl LinkStrategy for ResultBlocks {
    fn name(&self) -> &'static str {
        "result-blocks"
    }

    fn extract(&self, document: &Html) -> Result<Vec<LinkResult>> {
        let block_selector = selector(".result__body")?;
        let anchor_selector = selector("a.result__a")?;
        let snippet_selector = selector(".result__snippet")?;

        let mut results = Vec::new();

        for block in document.select(&block_selector) {
            let Some(anchor) = block.select(&anchor_selector).next() else {
                continue;
            };
            let (title, link) = title_and_link(anchor);
            let snippet = block
                .select(&snippet_selector)
                .next()
                .map(text_of)
                .unwrap_or_default();

            if let Some(result) = LinkResult::new(title, link, Some(snippet)) {
                results.push(result);
            }
        }

        Ok(results)
    }
}

/// Loose pass: every title anchor, without snippets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleAnchors;

impl LinkStrategy for TitleAnchors {
    fn name(&self) -> &'static str {
        "title-anchors"
    }

    fn extract(&self, document: &Html) -> Result<Vec<LinkResult>> {
        let anchor_selector = selector("a.result__a")?;

        Ok(document
            .select(&anchor_selector)
            .filter_map(|anchor| {
                let (title, link) = title_and_link(anchor);
                LinkResult::new(title, link, None)
            })
            .collect())
    }
}

/// Ordered chain of link strategies; the first non-empty answer wins.
pub struct LinkExtractor {
    strategies: Vec<Box<dyn LinkStrategy>>,
}

impl LinkExtractor {
    /// Creates an extractor trying `strategies` in order.
    pub fn new(strategies: Vec<Box<dyn LinkStrategy>>) -> Self {
        Self { strategies }
    }

    /// Appends a strategy to the end of the chain.
    pub fn with_strategy<S: LinkStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Runs the chain over `markup`. Strategy errors are logged and skipped.
    pub fn extract(&self, markup: &str) -> Vec<LinkResult> {
        let document = Html::parse_document(markup);

        for strategy in &self.strategies {
            match strategy.extract(&document) {
                Ok(results) if !results.is_empty() => {
                    debug!("Strategy {} extracted {} links", strategy.name(), results.len());
                    return results;
                }
                Ok(_) => debug!("Strategy {} found nothing", strategy.name()),
                Err(e) => warn!("Strategy {} failed: {}", strategy.name(), e),
            }
        }

        debug!("No link strategy matched the document");
        Vec::new()
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(vec![Box::new(ResultBlocks), Box::new(TitleAnchors)])
    }
}

/// Recovers the destination of a DuckDuckGo redirect link.
///
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...` becomes
/// `https://example.com`. Anything that is not a redirect, or whose
/// destination does not decode cleanly, is returned unchanged.
pub fn decode_redirect(href: &str) -> String {
    let Some(encoded) = redirect_param(href) else {
        return href.to_string();
    };

    match percent_decode_strict(encoded) {
        Some(decoded) => decoded,
        None => {
            debug!("Keeping undecodable redirect link {}", href);
            href.to_string()
        }
    }
}

fn redirect_param(href: &str) -> Option<&str> {
    let start = href.find(REDIRECT_PATH)?;
    let query = &href[start + REDIRECT_PATH.len()..];
    let query = query.split('#').next().unwrap_or(query);

    query.split('&').find_map(|pair| {
        pair.strip_prefix(REDIRECT_PARAM)
            .and_then(|rest| rest.strip_prefix('='))
            .filter(|value| !value.is_empty())
    })
}

/// Percent-decodes `input`, failing on a `%` not followed by two hex digits
/// or on a result that is not valid UTF-8.
fn percent_decode_strict(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(input).ok().map(|s| s.into_owned())
}

fn title_and_link(anchor: ElementRef<'_>) -> (String, String) {
    let title = text_of(anchor);
    let link = anchor
        .value()
        .attr("href")
        .map(decode_redirect)
        .unwrap_or_default();
    (title, link)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector {css}: {e:?}")))
}
