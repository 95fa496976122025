use axum::http::StatusCode;
use thiserror::Error;

use crate::provider::error::{CacheError, RegistryError, ResolveError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Upstream(#[from] ResolveError),

    #[error("Cache read failed: {0}")]
    CacheRead(#[source] CacheError),

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HandlerError {
    /// HTTP status reported to the client
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Upstream(e) => match e.cause() {
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::RateLimited { .. } => StatusCode::SERVICE_UNAVAILABLE,
                RegistryError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                RegistryError::Network(_) | RegistryError::InvalidResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            HandlerError::CacheRead(_) | HandlerError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HandlerError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Seconds the client should wait before retrying, when the upstream told us
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            HandlerError::Upstream(e) => match e.cause() {
                RegistryError::RateLimited { retry_after_secs } => *retry_after_secs,
                _ => None,
            },
            _ => None,
        }
    }
}
