//! Rotation pipeline for one authenticated request.
//!
//! # Data Flow
//! ```text
//! Grid (decoded body)
//!     → matrix::validate_shape → matrix::validate_size
//!     → matrix::rotate_clockwise
//!     → peer::PeerClient::send (network hop, retried)
//!     → RotateOutcome (grids + statistics + elapsed time)
//! ```
//!
//! Authentication and body decoding happen before this point, in the HTTP layer.
//! The correlation id comes in as a parameter and goes out with the peer call.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::config::LimitsConfig;
use crate::matrix::{rotate_clockwise, validate_shape, validate_size, Grid, ShapeError, SizeError};
use crate::peer::{PeerClient, PeerError, Statistics};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Peer(#[from] PeerError),
}

/// Successful result of the rotate route.
#[derive(Debug, Clone, Serialize)]
pub struct RotateOutcome {
    pub original_matrix: Grid,
    pub rotated_matrix: Grid,
    pub statistics: Statistics,
    /// Wall-clock time from the start of authentication to response assembly.
    pub processing_time_ms: f64,
}

pub struct RotatePipeline {
    peer: Arc<PeerClient>,
    max_rows: usize,
    max_cols: usize,
}

impl RotatePipeline {
    pub fn new(peer: Arc<PeerClient>, limits: &LimitsConfig) -> Self {
        Self {
            peer,
            max_rows: limits.max_rows,
            max_cols: limits.max_cols,
        }
    }

    /// Validate, rotate and enrich `grid`. `started` marks pipeline entry.
    pub async fn run(
        &self,
        grid: Grid,
        request_id: &str,
        started: Instant,
    ) -> Result<RotateOutcome, PipelineError> {
        validate_shape(&grid)?;
        validate_size(&grid, self.max_rows, self.max_cols)?;

        let rotated = rotate_clockwise(&grid);
        tracing::debug!(
            request_id = %request_id,
            rows = grid.len(),
            cols = rotated.len(),
            "Matrix rotated"
        );

        let statistics = self.peer.send(&grid, &rotated, request_id).await?;

        Ok(RotateOutcome {
            original_matrix: grid,
            rotated_matrix: rotated,
            statistics,
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
