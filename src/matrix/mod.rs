//! Grid validation and transformation.
//!
//! # Data Flow
//! ```text
//! request body
//!     → validator.rs (shape, then size)
//!     → rotation.rs (90° clockwise, out of place)
//!     → original + rotated handed to the peer client
//! ```

pub mod rotation;
pub mod validator;

pub use rotation::rotate_clockwise;
pub use validator::{validate_shape, validate_size, ShapeError, SizeError};

/// Rows of a 2-D integer array.
pub type Grid = Vec<Vec<i64>>;
