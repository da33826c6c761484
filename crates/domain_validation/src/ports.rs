//! AI Provider Ports
//!
//! Validation is split into two provider calls. A `ReasoningProvider`
//! produces the medical necessity narrative with a confidence and a
//! decision; a `ComplianceProvider` turns the claim and that narrative into
//! regulatory checks. Production wires the OpenAI adapter and the rule-based
//! checker; demo mode wires the scenario-driven mock providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable};
use domain_claims::{ComplianceCheck, HealthcareClaim, ValidationStatus};

use crate::error::AiError;

/// Output of a reasoning call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalReasoning {
    pub text: String,
    /// Percentage in [0, 100]
    pub confidence: f64,
    pub status: ValidationStatus,
}

/// Port for medical necessity reasoning
#[async_trait]
pub trait ReasoningProvider: DomainPort + HealthCheckable {
    /// Short name used in logs
    fn provider_name(&self) -> &str;

    /// Analyzes a claim for medical necessity
    async fn medical_reasoning(&self, claim: &HealthcareClaim) -> Result<MedicalReasoning, AiError>;
}

/// Port for regulatory compliance checks
#[async_trait]
pub trait ComplianceProvider: DomainPort + HealthCheckable {
    fn provider_name(&self) -> &str;

    /// Runs compliance checks against a claim and its reasoning text
    async fn validate_compliance(
        &self,
        claim: &HealthcareClaim,
        reasoning: &str,
    ) -> Result<Vec<ComplianceCheck>, AiError>;
}
