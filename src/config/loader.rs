//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use std::str::FromStr;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' for environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read and deserialize a TOML config file. No validation.
fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Build the runtime configuration: optional file, then environment overrides, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    resolve_config_with(path, |var| std::env::var(var).ok())
}

/// `resolve_config` with an injected environment lookup.
pub fn resolve_config_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `GATEWAY_*` variables (and `PORT`) onto a configuration.
///
/// `lookup` resolves a variable name to its value; production passes `std::env::var`.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = parse_var("PORT", port)?;
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Some(addr) = lookup("GATEWAY_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(name) = lookup("GATEWAY_SERVICE_NAME") {
        config.service_name = name;
    }

    if let Some(secret) = lookup("GATEWAY_JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }
    if let Some(ttl) = lookup("GATEWAY_TOKEN_TTL_SECS") {
        config.auth.token_ttl_secs = parse_var("GATEWAY_TOKEN_TTL_SECS", ttl)?;
    }
    if let Some(username) = lookup("GATEWAY_AUTH_USERNAME") {
        config.auth.username = username;
    }
    if let Some(password) = lookup("GATEWAY_AUTH_PASSWORD") {
        config.auth.password = password;
    }

    if let Some(url) = lookup("GATEWAY_PEER_URL") {
        config.peer.base_url = url;
    }
    if let Some(retries) = lookup("GATEWAY_PEER_MAX_RETRIES") {
        config.peer.max_retries = parse_var("GATEWAY_PEER_MAX_RETRIES", retries)?;
    }

    if let Some(level) = lookup("GATEWAY_LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
