//! Provider selection.

use tracing::debug;

use crate::{Credentials, ProviderId, ProviderPreference};

/// Resolves a provider preference to one concrete provider.
///
/// Auto selection is a pure function of the credentials handed in at
/// construction: Google when its key and cx are set, then SerpApi, then the
/// DuckDuckGo scraper, which needs nothing.
#[derive(Debug, Clone, Default)]
pub struct ProviderSelector {
    credentials: Credentials,
}

impl ProviderSelector {
    /// Creates a selector over the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The credentials this selector decides on.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolves `preference` to a provider.
    pub fn resolve(&self, preference: ProviderPreference) -> ProviderId {
        let id = match preference {
            ProviderPreference::Named(id) => id,
            ProviderPreference::Auto => self.auto(),
        };
        debug!("Provider preference {:?} resolved to {}", preference, id);
        id
    }

    /// Whether the credentials for `id` are present.
    pub fn is_configured(&self, id: ProviderId) -> bool {
        match id {
            ProviderId::DuckDuckGo => true,
            ProviderId::Google => self.credentials.has_google(),
            ProviderId::SerpApi => self.credentials.has_serpapi(),
        }
    }

    fn auto(&self) -> ProviderId {
        ProviderId::ALL
            .into_iter()
            .find(|id| self.is_configured(*id))
            .unwrap_or(ProviderId::DuckDuckGo)
    }
}
