//! Matrix rotation gateway library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod matrix;
pub mod observability;
pub mod peer;
pub mod pipeline;
pub mod resilience;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
