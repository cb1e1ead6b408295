//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers: request id, trace, timeout, body limit)
//!     → request.rs (correlation id handed to handlers)
//!     → middleware/auth.rs (bearer check, protected routes only)
//!     → handlers.rs (health, login, rotate → pipeline)
//!     → error.rs (JSON error bodies carrying the request id)
//!     → Send to client (X-Request-ID echoed)
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::{ApiError, ErrorClass};
pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
