//! Healthcare Claims Domain
//!
//! This crate models a medical claim from submission through AI validation:
//! the claim itself, the validation result produced for it, the business
//! metrics reported to executives, and the storage port.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Processing -> AI Review -> Approved / Denied / Requires Human Review
//! ```

pub mod claim;
pub mod submission;
pub mod validation;
pub mod metrics;
pub mod progress;
pub mod ports;
pub mod error;

pub use claim::{
    default_max_claim_amount, generate_claim_id, is_valid_claim_id, ClaimPriority, ClaimStatus,
    HealthcareClaim,
};
pub use submission::ClaimSubmission;
pub use validation::{
    clamp_confidence, ComplianceCheck, ExecutiveSummary, ValidationOutcome, ValidationResult,
    ValidationStatus, HUMAN_REVIEW_CONFIDENCE_THRESHOLD,
};
pub use metrics::{BaselineConstants, BusinessMetrics, BusinessMetricsCalculator};
pub use progress::{ProcessingProgress, ProcessingStage};
pub use ports::ClaimsPort;
pub use error::ClaimError;
