use std::sync::Arc;

use async_trait::async_trait;
use pocmap_types::{CheckRef, Fingerprint};
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::remote::AdvisorySearch;
use crate::store::DefinitionStore;
use crate::types::{Resolution, SourceKind};

/// Resolves a fingerprint into the set of checks worth running against it.
#[async_trait]
pub trait ResolveChecks: Send + Sync {
    async fn resolve(&self, fingerprint: &Fingerprint) -> Resolution;
}

/// Unions three sources: the remote advisory search (narrowed to local
/// definitions), advisory-prefixed local definitions, and a keyword walk of
/// the whole definition tree.
///
/// A failing source is logged and contributes nothing; the others are
/// unaffected.
pub struct CheckResolver {
    search: Arc<dyn AdvisorySearch>,
    store: DefinitionStore,
}

impl CheckResolver {
    pub fn new(search: Arc<dyn AdvisorySearch>, store: DefinitionStore) -> Self {
        Self { search, store }
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    async fn remote_checks(&self, fingerprint: &Fingerprint) -> Result<Vec<CheckRef>, SourceError> {
        let ids = self.search.search(fingerprint.as_str()).await?;
        debug!(%fingerprint, ids = ids.len(), "advisory search returned identifiers");
        Ok(self.store.lookup_ids(&ids))
    }

    async fn local_checks(
        &self,
        fingerprint: &Fingerprint,
    ) -> (
        Result<Vec<CheckRef>, SourceError>,
        Result<Vec<CheckRef>, SourceError>,
    ) {
        let store = self.store.clone();
        let keyword = fingerprint.as_str().to_owned();
        let walk = tokio::task::spawn_blocking(move || {
            (store.advisory_matches(&keyword), store.keyword_matches(&keyword))
        })
        .await;

        match walk {
            Ok(results) => results,
            Err(e) => (
                Err(SourceError::Join(e.to_string())),
                Err(SourceError::Join(e.to_string())),
            ),
        }
    }
}

#[async_trait]
impl ResolveChecks for CheckResolver {
    async fn resolve(&self, fingerprint: &Fingerprint) -> Resolution {
        let (remote, (advisory, keyword)) =
            tokio::join!(self.remote_checks(fingerprint), self.local_checks(fingerprint));

        let mut resolution = Resolution::default();
        for (kind, result) in [
            (SourceKind::Remote, remote),
            (SourceKind::Advisory, advisory),
            (SourceKind::Keyword, keyword),
        ] {
            match result {
                Ok(refs) => resolution.extend(kind, refs),
                Err(e) => {
                    warn!(%fingerprint, source = %kind, error = %e, "check source unavailable")
                }
            }
        }

        debug!(
            %fingerprint,
            total = resolution.len(),
            remote = resolution.remote,
            advisory = resolution.advisory,
            keyword = resolution.keyword,
            "resolved checks"
        );
        resolution
    }
}
