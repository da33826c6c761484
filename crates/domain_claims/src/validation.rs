//! AI validation outcome
//!
//! A `ValidationResult` combines the language-model reasoning with the
//! compliance checks for one claim. Results are immutable once created; a
//! claim may accumulate several and the latest by `created_at` wins.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{ClaimId, Money, ResultId};
use crate::claim::ClaimStatus;
use crate::error::ClaimError;
use crate::metrics::BusinessMetrics;

/// Results below this confidence are routed to a human reviewer
pub const HUMAN_REVIEW_CONFIDENCE_THRESHOLD: f64 = 70.0;

/// Upper bound on recorded processing time (five minutes)
pub const MAX_PROCESSING_TIME_MS: u64 = 300_000;

/// AI validation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Approved,
    Denied,
    PartialApproval,
    ComplianceViolation,
    InsufficientData,
    RequiresHumanReview,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Approved => "approved",
            ValidationStatus::Denied => "denied",
            ValidationStatus::PartialApproval => "partial_approval",
            ValidationStatus::ComplianceViolation => "compliance_violation",
            ValidationStatus::InsufficientData => "insufficient_data",
            ValidationStatus::RequiresHumanReview => "requires_human_review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(ValidationStatus::Approved),
            "denied" => Some(ValidationStatus::Denied),
            "partial_approval" => Some(ValidationStatus::PartialApproval),
            "compliance_violation" => Some(ValidationStatus::ComplianceViolation),
            "insufficient_data" => Some(ValidationStatus::InsufficientData),
            "requires_human_review" => Some(ValidationStatus::RequiresHumanReview),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named regulatory judgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub check_type: String,
    pub passed: bool,
    pub details: String,
    /// e.g. HIPAA, CMS
    pub regulatory_framework: String,
}

impl ComplianceCheck {
    pub fn new(
        check_type: impl Into<String>,
        passed: bool,
        details: impl Into<String>,
        regulatory_framework: impl Into<String>,
    ) -> Self {
        Self {
            check_type: check_type.into(),
            passed,
            details: details.into(),
            regulatory_framework: regulatory_framework.into(),
        }
    }
}

/// Headline figures for presentations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub status: String,
    pub confidence: String,
    pub cost_savings: String,
    pub processing_time: String,
    pub compliance_passed: bool,
    pub recommendation: String,
}

/// Inputs for building a [`ValidationResult`]
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub validation_status: ValidationStatus,
    pub confidence_score: f64,
    pub ai_reasoning_text: String,
    pub compliance_checks: Vec<ComplianceCheck>,
    pub business_metrics: BusinessMetrics,
    pub processing_time_ms: u64,
}

/// The AI validation outcome for a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub result_id: ResultId,
    pub claim_id: ClaimId,
    pub validation_status: ValidationStatus,
    /// Percentage in [0, 100], one decimal place
    pub confidence_score: f64,
    /// Savings versus manual review; mirrors `business_metrics.manual_review_cost_avoided`
    pub cost_reduction: Money,
    pub processing_time_ms: u64,
    pub ai_reasoning_text: String,
    pub compliance_checks: Vec<ComplianceCheck>,
    pub created_at: DateTime<Utc>,
    pub requires_human_review: bool,
    pub business_metrics: BusinessMetrics,
}

impl ValidationResult {
    /// Builds a result for `claim_id`, normalizing scores and deriving the review flag
    pub fn new(claim_id: &ClaimId, outcome: ValidationOutcome) -> Result<Self, ClaimError> {
        if outcome.ai_reasoning_text.trim().is_empty() {
            return Err(ClaimError::validation("ai_reasoning_text must not be empty"));
        }

        let confidence_score = clamp_confidence(outcome.confidence_score);

        if outcome.processing_time_ms > MAX_PROCESSING_TIME_MS {
            warn!(
                claim_id = %claim_id,
                processing_time_ms = outcome.processing_time_ms,
                "Processing time exceeds maximum, clamping"
            );
        }
        let processing_time_ms = outcome.processing_time_ms.clamp(1, MAX_PROCESSING_TIME_MS);

        let requires_human_review = confidence_score < HUMAN_REVIEW_CONFIDENCE_THRESHOLD
            || outcome.compliance_checks.iter().any(|c| !c.passed);

        Ok(Self {
            result_id: ResultId::for_claim(claim_id),
            claim_id: claim_id.clone(),
            validation_status: outcome.validation_status,
            confidence_score,
            cost_reduction: outcome.business_metrics.manual_review_cost_avoided,
            processing_time_ms,
            ai_reasoning_text: outcome.ai_reasoning_text,
            compliance_checks: outcome.compliance_checks,
            created_at: Utc::now(),
            requires_human_review,
            business_metrics: outcome.business_metrics,
        })
    }

    /// Approved or partially approved
    pub fn is_approved(&self) -> bool {
        matches!(
            self.validation_status,
            ValidationStatus::Approved | ValidationStatus::PartialApproval
        )
    }

    pub fn all_checks_passed(&self) -> bool {
        self.compliance_checks.iter().all(|c| c.passed)
    }

    pub fn executive_summary(&self) -> ExecutiveSummary {
        ExecutiveSummary {
            status: self.validation_status.to_string(),
            confidence: format!("{:.1}%", self.confidence_score),
            cost_savings: self.cost_reduction.to_string(),
            processing_time: format!("{:.1}s", self.processing_time_ms as f64 / 1000.0),
            compliance_passed: self.all_checks_passed(),
            recommendation: if self.is_approved() {
                "Approved".to_string()
            } else {
                "Requires Review".to_string()
            },
        }
    }

    /// Savings as a percentage of the manual review cost, one decimal place
    pub fn roi_percentage(&self, manual_cost: Money) -> f64 {
        if !manual_cost.is_positive() {
            return 0.0;
        }
        self.cost_reduction
            .percentage_of(manual_cost)
            .ok()
            .and_then(|p| p.to_f64())
            .unwrap_or(0.0)
    }

    /// Terminal claim status implied by this result
    pub fn claim_status(&self) -> ClaimStatus {
        if self.requires_human_review {
            return ClaimStatus::RequiresHumanReview;
        }
        match self.validation_status {
            ValidationStatus::Approved | ValidationStatus::PartialApproval => ClaimStatus::Approved,
            ValidationStatus::Denied | ValidationStatus::ComplianceViolation => ClaimStatus::Denied,
            _ => ClaimStatus::RequiresHumanReview,
        }
    }
}

/// Clamps to [0, 100] and rounds to one decimal place; NaN becomes 0
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
}
