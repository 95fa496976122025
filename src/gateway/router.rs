//! Structural path matching and dispatch
//!
//! Only two shapes are recognized:
//!
//! - `/v1/providers/{namespace}/{type}/versions`
//! - `/v1/providers/{namespace}/{type}/{version}/download/{os}/{arch}`
//!
//! They differ in segment count, so a path matches at most one of them.

use tracing::debug;

use crate::gateway::error::HandlerError;
use crate::gateway::handlers::ProviderHandlers;
use crate::gateway::response::{RegistryResponse, RequestContext};
use crate::provider::cache::VersionListingStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListVersions {
        namespace: String,
        provider_type: String,
    },
    Download {
        namespace: String,
        provider_type: String,
        version: String,
        os: String,
        arch: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Matched(Route),
    Unmatched,
}

/// Matches a request path against the known route shapes
///
/// Every segment must be non-empty and must not be `.` or `..`, so trailing
/// slashes, doubled separators and dot segments never match.
pub fn match_path(path: &str) -> RouteMatch {
    let Some(rest) = path.strip_prefix('/') else {
        return RouteMatch::Unmatched;
    };

    let segments: Vec<&str> = rest.split('/').collect();
    if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
        return RouteMatch::Unmatched;
    }

    match segments.as_slice() {
        ["v1", "providers", namespace, provider_type, "versions"] => {
            RouteMatch::Matched(Route::ListVersions {
                namespace: namespace.to_string(),
                provider_type: provider_type.to_string(),
            })
        }
        ["v1", "providers", namespace, provider_type, version, "download", os, arch] => {
            RouteMatch::Matched(Route::Download {
                namespace: namespace.to_string(),
                provider_type: provider_type.to_string(),
                version: version.to_string(),
                os: os.to_string(),
                arch: arch.to_string(),
            })
        }
        _ => RouteMatch::Unmatched,
    }
}

/// Dispatches request paths to the provider handlers
pub struct Router<S: VersionListingStore> {
    handlers: ProviderHandlers<S>,
}

impl<S: VersionListingStore> Router<S> {
    pub fn new(handlers: ProviderHandlers<S>) -> Self {
        Self { handlers }
    }

    /// Route `path` to its handler and return the handler's result unchanged
    ///
    /// Unknown paths produce a 404 response, not an error.
    pub async fn dispatch(
        &self,
        path: &str,
        ctx: &RequestContext,
    ) -> Result<RegistryResponse, HandlerError> {
        let route = match match_path(path) {
            RouteMatch::Matched(route) => route,
            RouteMatch::Unmatched => {
                debug!("No route for {}", path);
                return Ok(RegistryResponse::not_found());
            }
        };

        debug!("Dispatching {} to {:?}", path, route);

        match route {
            Route::ListVersions {
                namespace,
                provider_type,
            } => {
                self.handlers
                    .list_versions(&namespace, &provider_type, ctx)
                    .await
            }
            Route::Download {
                namespace,
                provider_type,
                version,
                os,
                arch,
            } => {
                self.handlers
                    .download(&namespace, &provider_type, &version, &os, &arch)
                    .await
            }
        }
    }
}
