//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Returns every violation found,
//! not just the first, so an operator can fix a config file in one pass.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::config::schema::{GatewayConfig, PeerConfig};
use crate::resilience::RetryPolicy;

/// A single semantic violation in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration: GatewayConfig → Result<(), Vec<ValidationError>>.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty"));
    }
    if config.auth.token_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.token_ttl_secs", "must be greater than 0"));
    }
    if config.auth.username.is_empty() {
        errors.push(ValidationError::new("auth.username", "must not be empty"));
    }

    match url::Url::parse(&config.peer.base_url) {
        Ok(url) if url.scheme() == "http" && url.has_host() => {}
        Ok(url) => errors.push(ValidationError::new(
            "peer.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "peer.base_url",
            format!("'{}' is not a valid URL: {}", config.peer.base_url, e),
        )),
    }
    if config.peer.request_timeout_secs == 0 {
        errors.push(ValidationError::new("peer.request_timeout_secs", "must be greater than 0"));
    }
    if config.peer.base_delay_ms > config.peer.max_delay_ms {
        errors.push(ValidationError::new(
            "peer.base_delay_ms",
            "must not exceed peer.max_delay_ms",
        ));
    }

    if config.limits.max_rows == 0 {
        errors.push(ValidationError::new("limits.max_rows", "must be greater than 0"));
    }
    if config.limits.max_cols == 0 {
        errors.push(ValidationError::new("limits.max_cols", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else {
        let budget = peer_budget(&config.peer);
        if Duration::from_secs(config.timeouts.request_secs) < budget {
            errors.push(ValidationError::new(
                "timeouts.request_secs",
                format!(
                    "must cover the worst-case peer budget of {}ms (every attempt timing out plus backoff)",
                    budget.as_millis()
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Longest the peer client can take: every attempt hits its deadline and every backoff is slept.
pub fn peer_budget(peer: &PeerConfig) -> Duration {
    let policy = RetryPolicy::from_config(peer);
    Duration::from_secs(peer.request_timeout_secs)
        .saturating_mul(policy.max_attempts())
        .saturating_add(policy.total_backoff())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let mut config = GatewayConfig::default();
        config.auth.jwt_secret.clear();
        config.peer.base_url = "ftp://stats".into();
        config.limits.max_rows = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["auth.jwt_secret", "peer.base_url", "limits.max_rows"]);
    }

    #[test]
    fn request_timeout_must_cover_peer_retries() {
        let mut config = GatewayConfig::default();
        assert_eq!(peer_budget(&config.peer), Duration::from_millis(20_700));

        config.peer.max_retries = 5;
        assert_eq!(peer_budget(&config.peer), Duration::from_millis(33_100));
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.request_secs");
        assert!(errors[0].message.contains("33100ms"));

        config.timeouts.request_secs = 34;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_relative_peer_url() {
        let mut config = GatewayConfig::default();
        config.peer.base_url = "stats:3001/process".into();
        assert!(validate_config(&config).is_err());
    }
}
