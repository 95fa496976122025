//! Common types shared by the resolver, the cache and the gateway

use serde::{Deserialize, Serialize};

/// A normalized provider version, as served by the registry protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: String,
}

impl Version {
    /// Normalizes an upstream release tag by stripping a single leading `v`
    pub fn from_tag(tag: &str) -> Self {
        let version = tag.strip_prefix('v').unwrap_or(tag);
        Self {
            version: version.to_string(),
        }
    }
}

/// Identifies a provider both upstream and in the cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    pub namespace: String,
    pub provider_type: String,
    pub system: String,
}

impl ProviderKey {
    pub fn new(namespace: &str, provider_type: &str, system: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            provider_type: provider_type.to_string(),
            system: system.to_string(),
        }
    }

    /// Repository name following the `terraform-<system>-<type>` convention
    pub fn repository(&self) -> String {
        format!("terraform-{}-{}", self.system, self.provider_type)
    }

    /// Full `owner/repository` path on the upstream host
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.namespace, self.repository())
    }

    /// Partition key of the cached version listing
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.namespace, self.provider_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v1.4.0", "1.4.0")]
    #[case("1.4.0", "1.4.0")]
    #[case("vv1.0", "v1.0")]
    #[case("v", "")]
    #[case("release-1.0", "release-1.0")]
    fn from_tag_strips_exactly_one_leading_v(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(Version::from_tag(tag).version, expected);
    }

    #[test]
    fn provider_key_derives_repository_and_cache_key() {
        let key = ProviderKey::new("acme", "widget", "aws");

        assert_eq!(key.repository(), "terraform-aws-widget");
        assert_eq!(key.repository_path(), "acme/terraform-aws-widget");
        assert_eq!(key.cache_key(), "acme/widget");
    }

    #[test]
    fn version_serializes_as_registry_object() {
        let json = serde_json::to_value(Version::from_tag("v2.0.0")).unwrap();
        assert_eq!(json, serde_json::json!({ "version": "2.0.0" }));
    }
}
