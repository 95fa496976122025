//! GitHub Releases API registry implementation

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::provider::error::RegistryError;
use crate::provider::registry::ReleaseRegistry;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Maximum page size accepted by the releases endpoint
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched for a single repository
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Response from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Registry implementation for GitHub Releases API
pub struct GitHubRegistry {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    per_page: u32,
    max_pages: u32,
}

impl GitHubRegistry {
    /// Creates a new GitHubRegistry with a custom base URL and an optional API token
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("provider-registry-gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Overrides the page size and the page limit
    pub fn with_pagination(mut self, per_page: u32, max_pages: u32) -> Self {
        self.per_page = per_page.clamp(1, DEFAULT_PER_PAGE);
        self.max_pages = max_pages.max(1);
        self
    }

    async fn fetch_page(
        &self,
        repository_path: &str,
        page: u32,
    ) -> Result<Vec<Release>, RegistryError> {
        let url = format!(
            "{}/repos/{}/releases?per_page={}&page={}",
            self.base_url, repository_path, self.per_page, page
        );

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(repository_path.to_string()));
        }

        // GitHub signals an exhausted primary rate limit with 403 and a zero remaining count
        let rate_limited = status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN
                && response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .is_some_and(|v| v.as_bytes() == b"0"));
        if rate_limited {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

fn map_send_error(e: reqwest::Error) -> RegistryError {
    if e.is_timeout() {
        RegistryError::Timeout
    } else {
        RegistryError::Network(e)
    }
}

#[async_trait::async_trait]
impl ReleaseRegistry for GitHubRegistry {
    async fn fetch_release_tags(
        &self,
        owner: &str,
        repository: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let repository_path = format!("{}/{}", owner, repository);
        let mut tags = Vec::new();

        for page in 1..=self.max_pages {
            let releases = self.fetch_page(&repository_path, page).await?;
            let count = releases.len();
            debug!(
                "Fetched page {} of releases for {}: {} entries",
                page, repository_path, count
            );

            tags.extend(releases.into_iter().map(|r| r.tag_name));

            if count < self.per_page as usize {
                return Ok(tags);
            }
        }

        // Every allowed page was full; the listing is complete only if nothing follows
        let overflow = self
            .fetch_page(&repository_path, self.max_pages + 1)
            .await?;
        if !overflow.is_empty() {
            warn!(
                "Release listing for {} exceeds {} pages",
                repository_path, self.max_pages
            );
            return Err(RegistryError::InvalidResponse(format!(
                "release listing exceeds {} pages",
                self.max_pages
            )));
        }

        Ok(tags)
    }
}
