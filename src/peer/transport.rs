//! Single-shot HTTP exchange with the peer.
//!
//! # Responsibilities
//! - Own the pooled connection client (keep-alive, idle expiry, per-host idle cap)
//! - Enforce the per-attempt deadline, including reading the body
//! - Report status and raw body; interpretation belongs to the client

use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};
use thiserror::Error;

use crate::config::PeerConfig;
use crate::http::request::X_REQUEST_ID;

/// Upper bound on a peer response body.
const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

/// Raw reply from one attempt.
#[derive(Debug, Clone)]
pub struct PeerReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// The attempt never produced a complete HTTP response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid peer request: {0}")]
    Request(String),

    #[error("request to peer failed: {0}")]
    Connect(String),

    #[error("peer did not respond within {0:?}")]
    Timeout(Duration),

    #[error("failed to read peer response: {0}")]
    Body(String),
}

/// One POST of a JSON body to the peer.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn post_json(
        &self,
        uri: &str,
        body: Bytes,
        request_id: &str,
    ) -> Result<PeerReply, TransportError>;
}

/// Production transport over a pooled hyper client.
///
/// Cloning shares the pool, so one instance serves every in-flight request.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HyperTransport {
    pub fn new(config: &PeerConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(connector);

        Self {
            client,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[async_trait]
impl PeerTransport for HyperTransport {
    async fn post_json(
        &self,
        uri: &str,
        body: Bytes,
        request_id: &str,
    ) -> Result<PeerReply, TransportError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(X_REQUEST_ID, request_id)
            .body(Body::from(body))
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| TransportError::Connect(error_chain(&e)))?;

            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), MAX_RESPONSE_BYTES)
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;

            Ok::<_, TransportError>(PeerReply {
                status: parts.status,
                body,
            })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}

/// hyper's top-level error only says "client error (Connect)"; the cause is in the sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
