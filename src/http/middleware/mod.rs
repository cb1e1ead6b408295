pub mod auth;
pub mod deadline;
pub mod metrics;

pub use auth::{require_bearer, ReceivedAt};
pub use deadline::enforce_deadline;
pub use metrics::track_metrics;
