//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Resolve every request path to a content route
//! - Apply domain table reloads from the config watcher
//! - Bind server to listener

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::DeliveryConfig;
use crate::http::request::{propagate_request_id_layer, request_context, set_request_id_layer};
use crate::routing::{ContentRoute, DomainNameError, DomainTable, RequestRouteResolver};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RequestRouteResolver>,
}

/// Outcome of route resolution, attached to each request as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Requested path as received.
    pub path: String,
    /// Content route, or the path itself when no domain matched.
    pub route: String,
    pub content: Option<ContentRoute>,
}

/// JSON body returned by the delivery endpoint.
#[derive(Debug, Serialize)]
struct RouteResponse {
    path: String,
    route: String,
    culture: Option<String>,
    domain_id: Option<i32>,
}

/// HTTP front for route resolution.
pub struct DeliveryServer {
    router: Router,
    config: DeliveryConfig,
    resolver: Arc<RequestRouteResolver>,
}

impl DeliveryServer {
    /// Create a new server with the given configuration.
    pub fn new(config: DeliveryConfig) -> Result<Self, DomainNameError> {
        let table = DomainTable::from_source(&config, 1)?;
        let resolver = Arc::new(RequestRouteResolver::new(table));

        let state = AppState {
            resolver: resolver.clone(),
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            resolver,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DeliveryConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/{*path}", get(content_handler))
            .route("/", get(content_handler))
            .layer(middleware::from_fn_with_state(state.clone(), resolve_content_route))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn resolver(&self) -> Arc<RequestRouteResolver> {
        self.resolver.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    /// Run the server, applying configuration updates until shutdown.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<DeliveryConfig>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            domains = self.resolver.table().len(),
            "HTTP server starting"
        );

        tokio::spawn(apply_config_updates(self.resolver.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild and swap the domain table for every validated config update.
pub async fn apply_config_updates(
    resolver: Arc<RequestRouteResolver>,
    mut updates: mpsc::UnboundedReceiver<DeliveryConfig>,
) {
    while let Some(config) = updates.recv().await {
        let generation = resolver.table().generation() + 1;
        match DomainTable::from_source(&config, generation) {
            Ok(table) => resolver.reload(table),
            Err(e) => {
                tracing::error!(error = %e, generation, "Rejected domain table update");
            }
        }
    }
    tracing::debug!("Config update channel closed");
}

/// Resolves the request path and stores a [`ResolvedRoute`] extension.
async fn resolve_content_route(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let context = request_context(&request);
    let path = request.uri().path().to_string();

    let content = state.resolver.resolve(&context, &path);
    let route = content
        .as_ref()
        .map(|c| c.route.clone())
        .unwrap_or_else(|| path.clone());

    request.extensions_mut().insert(ResolvedRoute {
        path,
        route,
        content,
    });
    next.run(request).await
}

/// Unmatched paths are not an error: the body carries the path unchanged.
async fn content_handler(Extension(resolved): Extension<ResolvedRoute>) -> impl IntoResponse {
    let body = RouteResponse {
        culture: resolved.content.as_ref().map(|c| c.culture.clone()),
        domain_id: resolved.content.as_ref().map(|c| c.domain_id),
        path: resolved.path,
        route: resolved.route,
    };
    Json(body)
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
