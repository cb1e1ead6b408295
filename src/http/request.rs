//! Correlation identifiers.
//!
//! # Responsibilities
//! - Name the header every hop uses (`X-Request-ID`)
//! - Drop unusable caller ids before `SetRequestIdLayer` runs
//! - Hand the id set by `SetRequestIdLayer` to handlers as an explicit value
//!
//! # Design Decisions
//! - Caller-supplied ids are kept; missing, empty or non-UTF-8 ones become UUID v4
//! - The id is passed as a parameter through every stage, never looked up ambiently

use std::convert::Infallible;
use std::fmt;

use axum::extract::{FromRequestParts, Request};
use axum::http::{request::Parts, HeaderMap};
use tower_http::request_id::RequestId as LayerRequestId;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Opaque per-request correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Read the id from `X-Request-ID`, generating one if it is missing or unusable.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let assigned = parts
            .extensions
            .get::<LayerRequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .filter(|id| !id.is_empty());

        Ok(match assigned {
            Some(id) => Self(id.to_string()),
            None => Self::from_headers(&parts.headers),
        })
    }
}

/// Remove an `X-Request-ID` that is empty or not UTF-8 so the id layer replaces it.
pub fn normalize_request_id(mut request: Request) -> Request {
    let unusable = request
        .headers()
        .get(X_REQUEST_ID)
        .is_some_and(|v| v.is_empty() || v.to_str().is_err());
    if unusable {
        request.headers_mut().remove(X_REQUEST_ID);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn keeps_caller_id() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("trace-abc"));
        assert_eq!(RequestId::from_headers(&headers).as_str(), "trace-abc");
    }

    #[test]
    fn generates_when_missing() {
        let id = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, RequestId::new());
    }

    #[test]
    fn unusable_header_is_removed() {
        for value in [HeaderValue::from_static(""), HeaderValue::from_bytes(b"caf\xe9").unwrap()] {
            let mut request = Request::new(axum::body::Body::empty());
            request.headers_mut().insert(X_REQUEST_ID, value);
            assert!(normalize_request_id(request).headers().get(X_REQUEST_ID).is_none());
        }

        let mut request = Request::new(axum::body::Body::empty());
        request.headers_mut().insert(X_REQUEST_ID, HeaderValue::from_static("trace-abc"));
        assert_eq!(normalize_request_id(request).headers()[X_REQUEST_ID], "trace-abc");
    }

    #[test]
    fn generates_when_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID, HeaderValue::from_static(""));
        assert!(!RequestId::from_headers(&headers).as_str().is_empty());
    }
}
