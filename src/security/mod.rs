//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! POST /auth/login:
//!     → credentials.rs (compare against configured pair)
//!     → token.rs (issue signed token)
//!
//! Protected routes:
//!     → http/middleware/auth.rs (extract bearer credential)
//!     → token.rs (verify signature + validity window)
//!     → Claims attached to the request
//! ```

pub mod credentials;
pub mod token;

pub use credentials::Credentials;
pub use token::{Claims, IssuedToken, SigningError, TokenService, VerificationError};
