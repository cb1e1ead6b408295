//! Matrix Rotation Gateway
//!
//! Authenticates callers with signed bearer tokens, rotates their matrices and
//! enriches the result with statistics from a peer service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http server ──▶ auth middleware ──▶ rotate handler
//!                                                        │
//!                                                        ▼
//!                                          pipeline: validate → rotate
//!                                                        │
//!                                                        ▼
//!     Client ◀── JSON response ◀── statistics ◀── peer client (retry/backoff) ◀──▶ Peer
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```
//!
//! # Environment
//!
//! - `GATEWAY_CONFIG`: optional path to a TOML config file
//! - `PORT`, `GATEWAY_*`: overrides applied on top of the file (see `config::loader`)

use std::path::PathBuf;

use matrix_gateway::config::resolve_config;
use matrix_gateway::lifecycle::startup;
use matrix_gateway::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from);
    let config = resolve_config(config_path.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("{} v{} starting", config.service_name, env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        peer = %config.peer.base_url,
        max_retries = config.peer.max_retries,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
