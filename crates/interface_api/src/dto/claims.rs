//! Claims DTOs
//!
//! Submissions are parsed straight into [`domain_claims::ClaimSubmission`];
//! only the response shapes live here.

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money, SessionId};
use domain_claims::{
    ClaimStatus, ExecutiveSummary, HealthcareClaim, ProcessingProgress, ValidationResult,
};

/// Seconds a client should expect a validation to take
pub const ESTIMATED_PROCESSING_TIME_SECONDS: u32 = 120;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub claim_id: ClaimId,
    pub status: ClaimStatus,
    pub session_id: SessionId,
    pub estimated_processing_time_seconds: u32,
    pub estimated_cost: Money,
    pub validation_result: ValidationResult,
    pub executive_summary: ExecutiveSummary,
}

impl SubmissionResponse {
    pub fn new(
        claim_id: ClaimId,
        session_id: SessionId,
        estimated_cost: Money,
        result: ValidationResult,
    ) -> Self {
        Self {
            message: "Claim submitted for validation".to_string(),
            claim_id,
            status: result.claim_status(),
            session_id,
            estimated_processing_time_seconds: ESTIMATED_PROCESSING_TIME_SECONDS,
            estimated_cost,
            executive_summary: result.executive_summary(),
            validation_result: result,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimStatusResponse {
    pub claim: HealthcareClaim,
    pub status: ClaimStatus,
    pub validation: Option<ValidationResult>,
    pub processing_progress: ProcessingProgress,
}

impl ClaimStatusResponse {
    pub fn new(claim: HealthcareClaim, validation: Option<ValidationResult>) -> Self {
        let processing_progress = ProcessingProgress::for_claim(claim.status, validation.is_some());
        Self {
            status: claim.status,
            claim,
            validation,
            processing_progress,
        }
    }
}
