//! HTTP front end and server lifecycle

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::State;
use axum::http::{HeaderValue, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router as HttpRouter};
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::{GatewayConfig, github_token};
use crate::gateway::error::HandlerError;
use crate::gateway::handlers::ProviderHandlers;
use crate::gateway::response::{RegistryResponse, RequestContext};
use crate::gateway::router::Router;
use crate::provider::cache::{CacheStore, VersionListingStore};
use crate::provider::registries::github::GitHubRegistry;
use crate::provider::resolver::VersionResolver;

pub struct AppState<S: VersionListingStore> {
    pub router: Router<S>,
    pub request_timeout: Duration,
}

impl IntoResponse for RegistryResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request failed: {}", self);
        }

        let mut response = (status, Json(json!({ "errors": [self.to_string()] }))).into_response();
        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

/// Build the HTTP application; every path is handed to the registry router
pub fn create_app<S: VersionListingStore>(state: Arc<AppState<S>>) -> HttpRouter {
    HttpRouter::new()
        .fallback(serve_registry::<S>)
        .with_state(state)
}

async fn serve_registry<S: VersionListingStore>(
    State(state): State<Arc<AppState<S>>>,
    uri: Uri,
) -> Result<RegistryResponse, HandlerError> {
    let ctx = RequestContext::with_timeout(state.request_timeout);
    state.router.dispatch(uri.path(), &ctx).await
}

/// Wire the production collaborators from configuration
pub fn build_state(config: &GatewayConfig) -> anyhow::Result<AppState<CacheStore>> {
    let db_path = config.db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    let store = CacheStore::new(&db_path).context("Failed to initialize cache")?;

    let token = github_token();
    if token.is_none() {
        warn!("GITHUB_TOKEN is not set; upstream requests are unauthenticated");
    }
    let registry = GitHubRegistry::new(&config.github.base_url, token)
        .context("Failed to create GitHub client")?
        .with_pagination(config.github.per_page, config.github.max_pages);

    let handlers = ProviderHandlers::new(
        VersionResolver::new(Arc::new(registry)),
        Arc::new(store),
        config.freshness_window(),
        &config.provider.system,
    );

    Ok(AppState {
        router: Router::new(handlers),
        request_timeout: config.request_timeout(),
    })
}

pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(build_state(&config)?);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    info!("Listening on {}", config.server.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
