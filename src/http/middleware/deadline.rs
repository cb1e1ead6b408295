//! Whole-request deadline.
//! An expired request is answered as upstream-unavailable with the usual JSON error body.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::request::RequestId;

pub async fn enforce_deadline(
    State(limit): State<Duration>,
    request_id: RequestId,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(request_id = %request_id, limit = ?limit, "Request deadline exceeded");
            ApiError::unavailable(
                format!("request did not complete within {}s", limit.as_secs()),
                request_id,
            )
            .into_response()
        }
    }
}
