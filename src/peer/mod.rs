//! Statistics peer subsystem.
//!
//! # Data Flow
//! ```text
//! (original, rotated, request_id)
//!     → client.rs (serialize once, retry loop)
//!     → transport.rs (pooled POST <base_url>/process, per-attempt deadline)
//!     → client.rs (status check, decode, classify)
//!     → Statistics | PeerError
//! ```

pub mod client;
pub mod transport;
pub mod types;

pub use client::{AttemptError, PeerClient, PeerError};
pub use transport::{HyperTransport, PeerReply, PeerTransport, TransportError};
pub use types::{PeerRequest, PeerResponse, Statistics};
