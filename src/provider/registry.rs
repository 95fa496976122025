//! Registry trait for listing releases from the upstream source host

#[cfg(test)]
use mockall::automock;

use crate::provider::error::RegistryError;

/// Trait for listing the release tags of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Fetches the tag names of all releases of a repository
    ///
    /// # Arguments
    /// * `owner` - The account owning the repository (e.g., "hashicorp")
    /// * `repository` - The repository name (e.g., "terraform-provider-aws")
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Release tags in the order the upstream lists them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_release_tags(
        &self,
        owner: &str,
        repository: &str,
    ) -> Result<Vec<String>, RegistryError>;
}
