//! Error responses.
//!
//! Every failure leaves the service as `{"error": <message>, "request_id": <id>}`
//! with a status chosen by its class. No internal detail beyond the message is exposed.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http::request::RequestId;
use crate::pipeline::PipelineError;

/// Error taxonomy at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed body, bad grid shape, size limit exceeded.
    ClientInput,
    /// Missing or invalid credentials.
    Auth,
    /// The statistics peer could not be used.
    Upstream,
    /// Failure on our side (token signing).
    Internal,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorClass::ClientInput => StatusCode::BAD_REQUEST,
            ErrorClass::Auth => StatusCode::UNAUTHORIZED,
            ErrorClass::Upstream => StatusCode::SERVICE_UNAVAILABLE,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub class: ErrorClass,
    pub message: String,
    pub request_id: RequestId,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    request_id: &'a str,
}

impl ApiError {
    pub fn new(class: ErrorClass, message: impl Into<String>, request_id: RequestId) -> Self {
        Self {
            class,
            message: message.into(),
            request_id,
        }
    }

    pub fn bad_request(message: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(ErrorClass::ClientInput, message, request_id)
    }

    pub fn unauthorized(message: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(ErrorClass::Auth, message, request_id)
    }

    pub fn unavailable(message: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(ErrorClass::Upstream, message, request_id)
    }

    pub fn internal(message: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(ErrorClass::Internal, message, request_id)
    }

    /// Map a pipeline failure: grid problems are the caller's, peer problems are upstream.
    pub fn from_pipeline(err: PipelineError, request_id: RequestId) -> Self {
        match err {
            PipelineError::Shape(e) => Self::bad_request(e.to_string(), request_id),
            PipelineError::Size(e) => Self::bad_request(e.to_string(), request_id),
            PipelineError::Peer(e) => Self::unavailable(
                format!("failed to process matrix with statistics service: {}", e),
                request_id,
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.class.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            request_id: self.request_id.as_str(),
        };
        let mut response = (self.status(), Json(body)).into_response();

        if self.class == ErrorClass::Auth {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
