//! Bearer token middleware.
//! Guards protected routes; verified claims and the entry instant are attached to the request.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::request::RequestId;
use crate::http::server::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// When the protected pipeline started, i.e. before authentication.
#[derive(Debug, Clone, Copy)]
pub struct ReceivedAt(pub Instant);

pub async fn require_bearer(
    State(state): State<AppState>,
    request_id: RequestId,
    mut request: Request,
    next: Next,
) -> Response {
    let received_at = ReceivedAt(Instant::now());

    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(message) => {
            tracing::debug!(request_id = %request_id, reason = message, "Rejected unauthenticated request");
            return ApiError::unauthorized(message, request_id).into_response();
        }
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(request_id = %request_id, reason = %e, "Token verification failed");
            return ApiError::unauthorized("invalid or expired token", request_id).into_response();
        }
    };

    tracing::debug!(request_id = %request_id, subject = %claims.sub, "Authenticated");
    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(received_at);
    next.run(request).await
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or("missing authorization header")?;
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or("invalid authorization header format")?;

    if token.is_empty() {
        return Err("missing token");
    }
    Ok(token)
}
