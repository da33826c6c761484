//! Processing progress reported to polling clients

use serde::{Deserialize, Serialize};

use crate::claim::ClaimStatus;

/// Coarse pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    Submitted,
    AiReasoning,
    Complete,
}

/// Snapshot of how far a claim has progressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingProgress {
    pub stage: ProcessingStage,
    pub completion_percentage: u8,
    pub current_step: String,
    pub estimated_remaining_seconds: u32,
}

impl ProcessingProgress {
    /// A stored validation result always means the claim is complete
    pub fn for_claim(status: ClaimStatus, has_result: bool) -> Self {
        let (stage, pct, step, remaining) = if has_result {
            (ProcessingStage::Complete, 100, "Validation completed", 0)
        } else {
            match status {
                ClaimStatus::AiReview => (
                    ProcessingStage::AiReasoning,
                    50,
                    "AI medical reasoning in progress",
                    60,
                ),
                ClaimStatus::Processing => (
                    ProcessingStage::Submitted,
                    10,
                    "Claim validation initiated",
                    120,
                ),
                _ => (ProcessingStage::Submitted, 0, "Awaiting processing", 120),
            }
        };

        Self {
            stage,
            completion_percentage: pct,
            current_step: step.to_string(),
            estimated_remaining_seconds: remaining,
        }
    }
}
