//! Request/response data transfer objects

pub mod claims;
pub mod envelope;
pub mod sessions;

pub use claims::{ClaimStatusResponse, SubmissionResponse};
pub use envelope::{ErrorBody, ErrorEnvelope, SuccessEnvelope};
pub use sessions::{HealthResponse, ReadinessResponse, SessionResetResponse};
