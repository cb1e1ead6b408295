//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Signing key used when no secret is configured. Only suitable for local development.
pub const DEVELOPMENT_SIGNING_KEY: &str = "development-secret-key-change-in-production";

/// Root configuration for the matrix gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Name reported by the health endpoint.
    pub service_name: String,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Token issuance and login credentials.
    pub auth: AuthConfig,

    /// Statistics peer connection and retry settings.
    pub peer: PeerConfig,

    /// Input size limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service_name: "matrix-gateway".to_string(),
            listener: ListenerConfig::default(),
            auth: AuthConfig::default(),
            peer: PeerConfig::default(),
            limits: LimitsConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Token and credential configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric key for HS256 signing.
    pub jwt_secret: String,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,

    /// Issuer tag written into every token.
    pub issuer: String,

    /// Expected login username.
    pub username: String,

    /// Expected login password.
    pub password: String,
}

impl AuthConfig {
    /// True when the built-in development key is still in use.
    pub fn uses_development_key(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_SIGNING_KEY
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            jwt_secret: DEVELOPMENT_SIGNING_KEY.to_string(),
            token_ttl_secs: 3600,
            issuer: "matrix-gateway".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Statistics peer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Base URL of the statistics service (e.g., "http://stats:3001").
    pub base_url: String,

    /// Retries allowed after the first attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Deadline for a single attempt in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Idle connections kept per peer host.
    pub pool_max_idle_per_host: usize,

    /// Seconds an idle pooled connection survives.
    pub pool_idle_timeout_secs: u64,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 10_000,
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            pool_max_idle_per_host: 10,
            pool_idle_timeout_secs: 90,
        }
    }
}

/// Grid and body size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_rows: usize,
    pub max_cols: usize,
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rows: 1000,
            max_cols: 1000,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [peer]
            base_url = "http://stats:3001"
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.peer.base_url, "http://stats:3001");
        assert_eq!(config.peer.max_retries, 5);
        assert_eq!(config.peer.base_delay_ms, 100);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.limits.max_rows, 1000);
        assert!(config.auth.uses_development_key());
    }
}
