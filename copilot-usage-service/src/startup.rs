//! Application startup and lifecycle management.

use crate::config::UsageServiceConfig;
use crate::handlers::{self, usage};
use crate::services::{GitHubSourceFactory, UsageSourceFactory};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{http_trace_layer, request_id_middleware},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Shared application state. Immutable; per-request clients are built by
/// `sources`.
#[derive(Clone)]
pub struct AppState {
    pub config: UsageServiceConfig,
    pub sources: Arc<dyn UsageSourceFactory>,
}

impl AppState {
    pub fn new(config: UsageServiceConfig, sources: Arc<dyn UsageSourceFactory>) -> Self {
        Self { config, sources }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/copilot/usage", post(usage::fetch_usage))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the GitHub API.
    pub async fn build(config: UsageServiceConfig) -> Result<Self, AppError> {
        let sources = Arc::new(GitHubSourceFactory::new(config.github.clone()));
        Self::build_with_sources(config, sources).await
    }

    /// Build the application with an explicit usage source factory.
    pub async fn build_with_sources(
        config: UsageServiceConfig,
        sources: Arc<dyn UsageSourceFactory>,
    ) -> Result<Self, AppError> {
        let host: std::net::IpAddr = config.common.host.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid host '{}': {}",
                config.common.host,
                e
            ))
        })?;

        // Port 0 binds a random port for testing.
        let addr = SocketAddr::new(host, config.common.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            github_api = %config.github.api_base_url,
            "Copilot usage service: HTTP on port {}",
            port
        );

        let router = build_router(AppState::new(config, sources));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
