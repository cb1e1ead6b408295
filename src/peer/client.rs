//! Statistics peer client with bounded retry.
//!
//! # Responsibilities
//! - Serialize the grid pair and correlation id once per call
//! - Repeat transient failures with exponential backoff
//! - Fail fast on 4xx, fail with the last cause once attempts run out

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use thiserror::Error;

use crate::config::PeerConfig;
use crate::matrix::Grid;
use crate::observability::metrics;
use crate::peer::transport::{HyperTransport, PeerReply, PeerTransport, TransportError};
use crate::peer::types::{PeerRequest, PeerResponse, Statistics};
use crate::resilience::{is_retryable, RetryPolicy, Retryable};

/// Longest slice of a peer error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Why a single attempt failed.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("peer returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode peer response: {0}")]
    Decode(String),
}

impl AttemptError {
    fn outcome(&self) -> &'static str {
        match self {
            AttemptError::Transport(_) => "transport",
            AttemptError::Status { .. } => "status",
            AttemptError::Decode(_) => "decode",
        }
    }
}

impl Retryable for AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Transport(_) => is_retryable(None, true),
            AttemptError::Status { status, .. } => is_retryable(Some(*status), false),
            // A garbled body may be a truncated transfer.
            AttemptError::Decode(_) => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("failed to encode peer request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("peer rejected the request: {0}")]
    Rejected(AttemptError),

    #[error("peer unavailable after {attempts} attempts: {last}")]
    Unavailable { attempts: u32, last: AttemptError },
}

/// Client for the statistics peer. Share one instance (behind `Arc`) across requests.
pub struct PeerClient {
    transport: Arc<dyn PeerTransport>,
    endpoint: String,
    policy: RetryPolicy,
}

impl PeerClient {
    /// Client over the pooled hyper transport.
    pub fn new(config: &PeerConfig) -> Self {
        Self::with_transport(config, Arc::new(HyperTransport::new(config)))
    }

    pub fn with_transport(config: &PeerConfig, transport: Arc<dyn PeerTransport>) -> Self {
        Self {
            transport,
            endpoint: format!("{}/process", config.base_url.trim_end_matches('/')),
            policy: RetryPolicy::from_config(config),
        }
    }

    /// Send the grid pair and return the peer's statistics.
    pub async fn send(
        &self,
        original: &Grid,
        rotated: &Grid,
        request_id: &str,
    ) -> Result<Statistics, PeerError> {
        let body = Bytes::from(serde_json::to_vec(&PeerRequest {
            original_matrix: original,
            rotated_matrix: rotated,
            request_id,
        })?);

        let mut attempt = 0;
        loop {
            let result = self
                .transport
                .post_json(&self.endpoint, body.clone(), request_id)
                .await
                .map_err(AttemptError::from)
                .and_then(decode_reply);

            let error = match result {
                Ok(response) => {
                    metrics::record_peer_attempt("ok");
                    tracing::debug!(request_id = %request_id, attempt, "Peer returned statistics");
                    return Ok(response.statistics);
                }
                Err(error) => error,
            };
            metrics::record_peer_attempt(error.outcome());

            if !error.is_retryable() {
                tracing::warn!(request_id = %request_id, attempt, error = %error, "Peer rejected request");
                return Err(PeerError::Rejected(error));
            }

            if !self.policy.should_retry(attempt, &error) {
                tracing::error!(
                    request_id = %request_id,
                    attempts = attempt + 1,
                    error = %error,
                    "Peer retries exhausted"
                );
                return Err(PeerError::Unavailable {
                    attempts: attempt + 1,
                    last: error,
                });
            }

            attempt += 1;
            let delay = self.policy.delay_for(attempt);
            tracing::info!(
                request_id = %request_id,
                attempt,
                delay = ?delay,
                error = %error,
                "Retrying peer call"
            );
            metrics::record_peer_retry();
            tokio::time::sleep(delay).await;
        }
    }
}

fn decode_reply(reply: PeerReply) -> Result<PeerResponse, AttemptError> {
    if reply.status != StatusCode::OK {
        let body: String = String::from_utf8_lossy(&reply.body)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        return Err(AttemptError::Status {
            status: reply.status,
            body,
        });
    }

    serde_json::from_slice(&reply.body).map_err(|e| AttemptError::Decode(e.to_string()))
}
