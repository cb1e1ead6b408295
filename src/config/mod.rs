//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (GATEWAY_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to each subsystem at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; business logic never reads the environment
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, resolve_config, resolve_config_with, ConfigError};
pub use schema::{
    AuthConfig, GatewayConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, PeerConfig,
    TimeoutConfig, DEVELOPMENT_SIGNING_KEY,
};
pub use validation::{peer_budget, validate_config, ValidationError};
