//! Wire contract with the statistics peer.
//!
//! ```text
//! POST <base_url>/process
//!   → {original_matrix, rotated_matrix, request_id}
//!   ← 200 {rotated_matrix, statistics, request_id}
//! ```

use serde::{Deserialize, Serialize};

use crate::matrix::Grid;

/// Outbound body. Borrows the grids; nothing is copied before serialization.
#[derive(Debug, Serialize)]
pub struct PeerRequest<'a> {
    pub original_matrix: &'a Grid,
    pub rotated_matrix: &'a Grid,
    pub request_id: &'a str,
}

/// Successful peer reply.
#[derive(Debug, Clone, Deserialize)]
pub struct PeerResponse {
    #[serde(default)]
    pub rotated_matrix: Grid,
    pub statistics: Statistics,
    #[serde(default)]
    pub request_id: String,
}

/// Aggregates computed by the peer. Passed through to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub max_value: i64,
    pub min_value: i64,
    pub average: f64,
    pub total_sum: i64,
    pub original_is_diagonal: bool,
    pub rotated_is_diagonal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_time_ms: Option<f64>,
}
