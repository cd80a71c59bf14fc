//! Result picking and response shaping.

use rand::Rng;
use tracing::{debug, warn};

use crate::{ProviderId, ResultKind, ResultSet, SearchResponse};

/// Turns a provider's result set into the outward response by picking one
/// record uniformly at random. No ranking, weighting or deduplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Creates a new aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Builds the response using the thread-local RNG.
    pub fn respond(&self, provider: ProviderId, result_type: ResultKind, results: ResultSet) -> SearchResponse {
        self.respond_with(provider, result_type, results, &mut rand::thread_rng())
    }

    /// Builds the response using `rng` for the pick.
    pub fn respond_with<R: Rng + ?Sized>(
        &self,
        provider: ProviderId,
        result_type: ResultKind,
        results: ResultSet,
        rng: &mut R,
    ) -> SearchResponse {
        let results = if results.kind() == result_type {
            results
        } else {
            warn!(
                "Provider {} returned {} results for a {} query, ignoring them",
                provider,
                results.kind(),
                result_type
            );
            ResultSet::empty(result_type)
        };

        let count = results.len();
        let result = results.choose(rng);
        debug!("Picked one of {} results from {}", count, provider);

        SearchResponse {
            provider,
            result_type,
            count,
            result,
        }
    }
}
