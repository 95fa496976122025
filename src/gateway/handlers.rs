//! Handlers for the list-versions and download endpoints

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tokio::time::timeout_at;
use tracing::{debug, error, info};

use crate::gateway::error::HandlerError;
use crate::gateway::response::{DownloadBody, RegistryResponse, RequestContext, VersionsBody};
use crate::provider::cache::{VersionListingStore, is_fresh};
use crate::provider::resolver::VersionResolver;
use crate::provider::types::ProviderKey;

pub struct ProviderHandlers<S: VersionListingStore> {
    resolver: VersionResolver,
    store: Arc<S>,
    freshness_window: TimeDelta,
    system: String,
}

impl<S: VersionListingStore> ProviderHandlers<S> {
    pub fn new(
        resolver: VersionResolver,
        store: Arc<S>,
        freshness_window: TimeDelta,
        system: &str,
    ) -> Self {
        Self {
            resolver,
            store,
            freshness_window,
            system: system.to_string(),
        }
    }

    /// Serve the version listing, refreshing it from upstream when missing or stale
    ///
    /// A failed cache read fails the request. A failed cache write is logged
    /// and the freshly resolved listing is served anyway.
    pub async fn list_versions(
        &self,
        namespace: &str,
        provider_type: &str,
        ctx: &RequestContext,
    ) -> Result<RegistryResponse, HandlerError> {
        let key = ProviderKey::new(namespace, provider_type, &self.system);
        let cache_key = key.cache_key();

        let cached = self.store.get(&cache_key).map_err(HandlerError::CacheRead)?;

        match cached {
            Some(entry) if is_fresh(Utc::now(), entry.last_updated, self.freshness_window) => {
                debug!(
                    "Serving {} cached versions for {}",
                    entry.versions.len(),
                    cache_key
                );
                return Ok(RegistryResponse::ok(&VersionsBody {
                    versions: entry.versions,
                })?);
            }
            Some(entry) => info!(
                "Cached versions for {} are stale (last updated {}), refreshing",
                cache_key, entry.last_updated
            ),
            None => info!("No cached versions for {}, fetching", cache_key),
        }

        let versions = timeout_at(ctx.deadline, self.resolver.list_versions(&key))
            .await
            .map_err(|_| {
                error!("Deadline exceeded while resolving {}", key.repository_path());
                HandlerError::DeadlineExceeded
            })??;

        if let Err(e) = self.store.store(&cache_key, &versions) {
            error!(
                "Failed to cache versions for {}, serving uncached: {}",
                cache_key, e
            );
        }

        Ok(RegistryResponse::ok(&VersionsBody { versions })?)
    }

    /// Serve the download location of a version
    pub async fn download(
        &self,
        namespace: &str,
        provider_type: &str,
        version: &str,
        os: &str,
        arch: &str,
    ) -> Result<RegistryResponse, HandlerError> {
        let key = ProviderKey::new(namespace, provider_type, &self.system);
        let download_url = self.resolver.download_url(&key, version);
        debug!("Download URL for {}@{}: {}", key.cache_key(), version, download_url);

        Ok(RegistryResponse::ok(&DownloadBody {
            os: os.to_string(),
            arch: arch.to_string(),
            download_url,
        })?)
    }
}
