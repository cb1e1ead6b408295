//! Route handlers: health, login, rotate.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::middleware::ReceivedAt;
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::matrix::Grid;
use crate::pipeline::RotateOutcome;
use crate::security::Claims;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct RotateRequest {
    pub matrix: Grid,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.service_name.to_string(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(request_id = %request_id, error = %rejection, "Unreadable login body");
        ApiError::bad_request("invalid request body", request_id.clone())
    })?;

    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "username and password are required",
            request_id,
        ));
    }

    if !state.credentials.matches(&req.username, &req.password) {
        tracing::warn!(request_id = %request_id, username = %req.username, "Login failed");
        return Err(ApiError::unauthorized("invalid credentials", request_id));
    }

    let issued = state.tokens.issue(&req.username).map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Token signing failed");
        ApiError::internal("failed to issue token", request_id.clone())
    })?;

    tracing::info!(request_id = %request_id, username = %req.username, "Login succeeded");
    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

pub async fn rotate(
    State(state): State<AppState>,
    request_id: RequestId,
    Extension(claims): Extension<Claims>,
    Extension(ReceivedAt(started)): Extension<ReceivedAt>,
    body: Result<Json<RotateRequest>, JsonRejection>,
) -> Result<Json<RotateOutcome>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(request_id = %request_id, error = %rejection, "Unreadable rotate body");
        ApiError::bad_request(
            format!("invalid request body: {}", rejection.body_text()),
            request_id.clone(),
        )
    })?;

    match state.pipeline.run(req.matrix, request_id.as_str(), started).await {
        Ok(outcome) => {
            tracing::info!(
                request_id = %request_id,
                subject = %claims.sub,
                processing_time_ms = outcome.processing_time_ms,
                "Matrix processed"
            );
            Ok(Json(outcome))
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, subject = %claims.sub, error = %e, "Rotate failed");
            Err(ApiError::from_pipeline(e, request_id))
        }
    }
}
