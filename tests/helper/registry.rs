//! Gateway test utilities

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeDelta;
use tempfile::TempDir;
use tower::ServiceExt;

use provider_registry_gateway::gateway::handlers::ProviderHandlers;
use provider_registry_gateway::gateway::router::Router;
use provider_registry_gateway::gateway::server::{AppState, create_app};
use provider_registry_gateway::provider::cache::CacheStore;
use provider_registry_gateway::provider::registries::GitHubRegistry;
use provider_registry_gateway::provider::resolver::VersionResolver;

/// Repository path the test provider `acme/widget` resolves to
pub const RELEASES_PATH: &str = "/repos/acme/terraform-provider-widget/releases";

/// Create an empty cache store in a temporary directory
pub fn create_test_store() -> (TempDir, Arc<CacheStore>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let store = CacheStore::new(&db_path).unwrap();
    (temp_dir, Arc::new(store))
}

/// Build the HTTP app against a GitHub API served at `github_url`
pub fn create_test_app(github_url: &str, store: Arc<CacheStore>) -> axum::Router {
    let registry = GitHubRegistry::new(github_url, None).unwrap();
    let handlers = ProviderHandlers::new(
        VersionResolver::new(Arc::new(registry)),
        store,
        TimeDelta::minutes(55),
        "provider",
    );

    create_app(Arc::new(AppState {
        router: Router::new(handlers),
        request_timeout: Duration::from_secs(5),
    }))
}

/// Send a GET request and return the status and the raw body
pub async fn get(app: &axum::Router, path: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

/// Send a GET request and parse the body as JSON
pub async fn get_json(app: &axum::Router, path: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, path).await;
    (status, serde_json::from_slice(&body).unwrap())
}
