//! Claim validation orchestration
//!
//! ```text
//! claim -> reasoning -> compliance -> business metrics -> ValidationResult
//!             |             |
//!          fallback      fallback      (provider errors never surface)
//! ```
//!
//! Every provider call is audited and priced into the session ledger. A
//! failed call books the fixed failure cost and continues with a static
//! fallback, so a validation always yields a result unless the result
//! itself cannot be constructed.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use core_kernel::{audited, OperationMetadata, SessionId};
use domain_claims::{
    BusinessMetricsCalculator, ClaimError, ComplianceCheck, HealthcareClaim, ValidationOutcome,
    ValidationResult,
};
use domain_cost::{CostTracker, CostType, PricingTable};

use crate::fallback::{fallback_compliance_checks, fallback_reasoning};
use crate::ports::{ComplianceProvider, MedicalReasoning, ReasoningProvider};

pub struct ClaimValidationOrchestrator {
    reasoning: Arc<dyn ReasoningProvider>,
    compliance: Arc<dyn ComplianceProvider>,
    cost_tracker: Arc<CostTracker>,
    pricing: PricingTable,
    metrics: BusinessMetricsCalculator,
}

impl ClaimValidationOrchestrator {
    pub fn new(
        reasoning: Arc<dyn ReasoningProvider>,
        compliance: Arc<dyn ComplianceProvider>,
        cost_tracker: Arc<CostTracker>,
    ) -> Self {
        Self {
            reasoning,
            compliance,
            cost_tracker,
            pricing: PricingTable::default(),
            metrics: BusinessMetricsCalculator::default(),
        }
    }

    pub fn cost_tracker(&self) -> &Arc<CostTracker> {
        &self.cost_tracker
    }

    pub fn reasoning_provider(&self) -> &Arc<dyn ReasoningProvider> {
        &self.reasoning
    }

    pub fn compliance_provider(&self) -> &Arc<dyn ComplianceProvider> {
        &self.compliance
    }

    /// Runs the full AI validation for a claim and books its costs to `session_id`
    pub async fn validate_claim(
        &self,
        claim: &HealthcareClaim,
        session_id: &SessionId,
        metadata: &OperationMetadata,
    ) -> Result<ValidationResult, ClaimError> {
        let started = Instant::now();
        info!(
            claim_id = %claim.claim_id,
            session_id = %session_id,
            reasoning_provider = self.reasoning.provider_name(),
            compliance_provider = self.compliance.provider_name(),
            "Starting AI claim validation"
        );

        let reasoning = self.run_reasoning(claim, session_id, metadata).await;
        let checks = self
            .run_compliance(claim, &reasoning.text, session_id, metadata)
            .await;
        let business_metrics = self.metrics.calculate(claim, reasoning.confidence);

        let result = ValidationResult::new(
            &claim.claim_id,
            ValidationOutcome {
                validation_status: reasoning.status,
                confidence_score: reasoning.confidence,
                ai_reasoning_text: reasoning.text,
                compliance_checks: checks,
                business_metrics,
                processing_time_ms: started.elapsed().as_millis() as u64,
            },
        )?;

        self.cost_tracker
            .record_claim_processed(session_id, result.processing_time_ms)
            .await;

        info!(
            claim_id = %claim.claim_id,
            result_id = %result.result_id,
            validation_status = %result.validation_status,
            confidence_score = result.confidence_score,
            requires_human_review = result.requires_human_review,
            processing_time_ms = result.processing_time_ms,
            "AI claim validation completed"
        );

        Ok(result)
    }

    async fn run_reasoning(
        &self,
        claim: &HealthcareClaim,
        session_id: &SessionId,
        metadata: &OperationMetadata,
    ) -> MedicalReasoning {
        let call = self.reasoning.medical_reasoning(claim);
        match audited("ai_medical_reasoning", metadata, call).await {
            Ok(reasoning) => {
                let cost = self.pricing.reasoning_call_cost(&reasoning.text);
                self.cost_tracker
                    .record_cost(session_id, CostType::Reasoning, cost, "medical_reasoning")
                    .await;
                reasoning
            }
            Err(err) => {
                warn!(
                    claim_id = %claim.claim_id,
                    error = %err,
                    "Medical reasoning failed, using fallback"
                );
                let cost = self.pricing.failed_call_cost(CostType::Reasoning);
                self.cost_tracker
                    .record_cost(session_id, CostType::ReasoningFailed, cost, "medical_reasoning")
                    .await;
                fallback_reasoning(claim)
            }
        }
    }

    async fn run_compliance(
        &self,
        claim: &HealthcareClaim,
        reasoning: &str,
        session_id: &SessionId,
        metadata: &OperationMetadata,
    ) -> Vec<ComplianceCheck> {
        let call = self.compliance.validate_compliance(claim, reasoning);
        match audited("compliance_validation", metadata, call).await {
            Ok(checks) => {
                let cost = self.pricing.compliance_call_cost(checks.len());
                self.cost_tracker
                    .record_cost(session_id, CostType::Compliance, cost, "compliance_validation")
                    .await;
                checks
            }
            Err(err) => {
                warn!(
                    claim_id = %claim.claim_id,
                    error = %err,
                    "Compliance validation failed, using fallback"
                );
                let cost = self.pricing.failed_call_cost(CostType::Compliance);
                self.cost_tracker
                    .record_cost(
                        session_id,
                        CostType::ComplianceFailed,
                        cost,
                        "compliance_validation",
                    )
                    .await;
                fallback_compliance_checks()
            }
        }
    }
}
