//! Version resolution against the upstream release registry
//!
//! Turns upstream release tags into normalized [`Version`]s and derives the
//! download location of a provider version.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::provider::error::ResolveError;
use crate::provider::registry::ReleaseRegistry;
use crate::provider::types::{ProviderKey, Version};

/// Resolves provider versions and download URLs
pub struct VersionResolver {
    registry: Arc<dyn ReleaseRegistry>,
}

impl VersionResolver {
    pub fn new(registry: Arc<dyn ReleaseRegistry>) -> Self {
        Self { registry }
    }

    /// Lists all versions of a provider in upstream release order
    ///
    /// Versions are neither sorted nor deduplicated. A repository without
    /// releases yields an empty list.
    pub async fn list_versions(&self, key: &ProviderKey) -> Result<Vec<Version>, ResolveError> {
        let repository = key.repository();

        let tags = self
            .registry
            .fetch_release_tags(&key.namespace, &repository)
            .await
            .map_err(|source| {
                warn!(
                    "Failed to list releases for {}: {}",
                    key.repository_path(),
                    source
                );
                ResolveError::UpstreamUnavailable {
                    repository: key.repository_path(),
                    source,
                }
            })?;

        debug!(
            "Resolved {} releases for {}",
            tags.len(),
            key.repository_path()
        );

        Ok(tags.iter().map(|tag| Version::from_tag(tag)).collect())
    }

    /// Builds the download URL of a version without contacting the upstream
    pub fn download_url(&self, key: &ProviderKey, version: &str) -> String {
        download_url(key, version)
    }
}

/// `git::https://github.com/<namespace>/terraform-<system>-<type>?ref=v<version>`
pub fn download_url(key: &ProviderKey, version: &str) -> String {
    format!(
        "git::https://github.com/{}/{}?ref=v{}",
        key.namespace,
        key.repository(),
        version
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::error::RegistryError;
    use crate::provider::registry::MockReleaseRegistry;

    fn resolver_with_tags(tags: Vec<&str>) -> VersionResolver {
        let tags: Vec<String> = tags.into_iter().map(String::from).collect();
        let mut registry = MockReleaseRegistry::new();
        registry
            .expect_fetch_release_tags()
            .withf(|owner, repository| owner == "acme" && repository == "terraform-aws-widget")
            .returning(move |_, _| Ok(tags.clone()));
        VersionResolver::new(Arc::new(registry))
    }

    #[test]
    fn download_url_matches_registry_format() {
        let key = ProviderKey::new("acme", "widget", "aws");
        assert_eq!(
            download_url(&key, "2.0.0"),
            "git::https://github.com/acme/terraform-aws-widget?ref=v2.0.0"
        );
    }

    #[tokio::test]
    async fn list_versions_normalizes_tags_in_upstream_order() {
        let resolver = resolver_with_tags(vec!["v2.0.0", "1.4.0", "vv1.0", "v2.0.0"]);
        let key = ProviderKey::new("acme", "widget", "aws");

        let versions = resolver.list_versions(&key).await.unwrap();

        let versions: Vec<&str> = versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["2.0.0", "1.4.0", "v1.0", "2.0.0"]);
    }

    #[tokio::test]
    async fn list_versions_is_idempotent_for_unchanged_upstream() {
        let resolver = resolver_with_tags(vec!["v1.1.0", "v1.0.0"]);
        let key = ProviderKey::new("acme", "widget", "aws");

        let first = resolver.list_versions(&key).await.unwrap();
        let second = resolver.list_versions(&key).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn list_versions_returns_empty_for_repo_without_releases() {
        let resolver = resolver_with_tags(vec![]);
        let key = ProviderKey::new("acme", "widget", "aws");

        let versions = resolver.list_versions(&key).await.unwrap();

        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn list_versions_reports_upstream_unavailable_on_failure() {
        let mut registry = MockReleaseRegistry::new();
        registry
            .expect_fetch_release_tags()
            .returning(|_, _| Err(RegistryError::InvalidResponse("boom".to_string())));
        let resolver = VersionResolver::new(Arc::new(registry));
        let key = ProviderKey::new("acme", "widget", "aws");

        let result = resolver.list_versions(&key).await;

        match result {
            Err(ResolveError::UpstreamUnavailable { repository, source }) => {
                assert_eq!(repository, "acme/terraform-aws-widget");
                assert!(matches!(source, RegistryError::InvalidResponse(_)));
            }
            Ok(versions) => panic!("expected upstream failure, got {:?}", versions),
        }
    }
}
