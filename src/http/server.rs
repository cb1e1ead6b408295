//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, deadline, body limit, metrics)
//! - Guard protected routes with bearer authentication
//! - Build the shared peer client and rotation pipeline
//! - Bind server to listener and shut down gracefully

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers::{health, login, rotate};
use crate::http::middleware::{enforce_deadline, require_bearer, track_metrics};
use crate::http::request::{normalize_request_id, X_REQUEST_ID};
use crate::peer::{HyperTransport, PeerClient, PeerTransport};
use crate::pipeline::RotatePipeline;
use crate::security::{Credentials, TokenService};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<Credentials>,
    pub pipeline: Arc<RotatePipeline>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig, transport: Arc<dyn PeerTransport>) -> Self {
        let peer = Arc::new(PeerClient::with_transport(&config.peer, transport));

        Self {
            tokens: Arc::new(TokenService::from_config(&config.auth)),
            credentials: Arc::new(Credentials::from_config(&config.auth)),
            pipeline: Arc::new(RotatePipeline::new(peer, &config.limits)),
            service_name: Arc::from(config.service_name.as_str()),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server talking to the configured peer over pooled HTTP.
    pub fn new(config: GatewayConfig) -> Self {
        let transport = Arc::new(HyperTransport::new(&config.peer));
        Self::with_transport(config, transport)
    }

    /// Create a server with a caller-provided peer transport.
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn PeerTransport>) -> Self {
        let state = AppState::from_config(&config, transport);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route("/rotate", post(rotate))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

        // Outermost first: the id must exist before tracing and handlers see the request.
        let layers = ServiceBuilder::new()
            .map_request(normalize_request_id)
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(config.timeouts.request_secs),
                enforce_deadline,
            ));

        Router::new()
            .route("/health", get(health))
            .route("/auth/login", post(login))
            .merge(protected)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(layers)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            peer = %self.config.peer.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
