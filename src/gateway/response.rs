//! Registry responses and the per-request context

use std::time::Duration;

use axum::http::StatusCode;
use serde::Serialize;
use tokio::time::Instant;

use crate::provider::types::Version;

/// State carried through one request's handling
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    /// Upstream work still running at this instant is abandoned
    pub deadline: Instant,
}

impl RequestContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }
}

/// Result of a routed request: a status and an optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryResponse {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
}

impl RegistryResponse {
    pub fn ok<T: Serialize>(body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status: StatusCode::OK,
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// 404 with an empty body
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: None,
        }
    }
}

/// Body of the list-versions endpoint
#[derive(Debug, Serialize)]
pub struct VersionsBody {
    pub versions: Vec<Version>,
}

/// Body of the download endpoint
#[derive(Debug, Serialize)]
pub struct DownloadBody {
    pub os: String,
    pub arch: String,
    pub download_url: String,
}
