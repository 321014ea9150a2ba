//! HTTP server setup.
//!
//! # Responsibilities
//! - Resolve upstream URLs and the shared client once, at construction
//! - Create the Axum router with the feature and health routes
//! - Wire up middleware (request ID, tracing, CORS)
//! - Serve until the shutdown signal fires, then drain

use std::sync::Arc;

use axum::{body::Body, http::Request, routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, ProxyConfig};
use crate::http::handlers;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::lifecycle::shutdown;
use crate::wfs::{FeatureClient, GetFeatureRequest};

pub const HEALTH_PATH: &str = "/health";

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid upstream URL: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: FeatureClient,
    pub report_area: Arc<GetFeatureRequest>,
    pub breadcrumb_summit: Arc<GetFeatureRequest>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ServerError> {
        let upstream = &config.upstream;
        Ok(Self {
            client: FeatureClient::new(upstream)?,
            report_area: Arc::new(GetFeatureRequest::new(
                upstream,
                &config.endpoints.report_area,
            )?),
            breadcrumb_summit: Arc::new(GetFeatureRequest::new(
                upstream,
                &config.endpoints.breadcrumb_summit,
            )?),
        })
    }
}

/// HTTP server for the feature proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first, so a bad route path is reported
    /// as an error instead of panicking inside the router.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let state = AppState::from_config(&config)?;

        tracing::debug!(
            report_area = %state.report_area,
            breadcrumb_summit = %state.breadcrumb_summit,
            "Upstream requests resolved"
        );

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let endpoints = &config.endpoints;
        let router = Router::new()
            .route(HEALTH_PATH, get(handlers::health))
            .route(&endpoints.report_area.path, get(handlers::report_area_features))
            .route(
                &endpoints.breadcrumb_summit.path,
                get(handlers::breadcrumb_summit_features),
            )
            .with_state(state);

        let router = if config.http.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        };

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id(req.headers())
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            report_area = %self.config.endpoints.report_area.path,
            breadcrumb_summit = %self.config.endpoints.breadcrumb_summit.path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The assembled router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}
