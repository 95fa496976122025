use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp stored for {0}")]
    InvalidTimestamp(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Upstream unavailable for {repository}: {source}")]
    UpstreamUnavailable {
        repository: String,
        #[source]
        source: RegistryError,
    },
}

impl ResolveError {
    /// The upstream failure that caused this error
    pub fn cause(&self) -> &RegistryError {
        match self {
            ResolveError::UpstreamUnavailable { source, .. } => source,
        }
    }
}
