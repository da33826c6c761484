//! Rule-based compliance checker
//!
//! Runs three checks in sequence, each after a simulated service latency:
//!
//! | check | framework | passes when |
//! |-------|-----------|-------------|
//! | `HIPAA_PRIVACY` | HIPAA | always |
//! | `MEDICAL_NECESSITY` | CMS | clinical context longer than 50 characters |
//! | `CMS_GUIDELINES` | CMS | always |

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable};
use domain_claims::{ComplianceCheck, HealthcareClaim};

use crate::error::AiError;
use crate::ports::ComplianceProvider;

/// Context must be longer than this for medical necessity to be established
pub const MIN_NECESSITY_CONTEXT_CHARS: usize = 50;

/// Simulated per-check latencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceLatencies {
    pub hipaa: Duration,
    pub medical_necessity: Duration,
    pub cms: Duration,
}

impl Default for ComplianceLatencies {
    fn default() -> Self {
        Self {
            hipaa: Duration::from_millis(100),
            medical_necessity: Duration::from_millis(200),
            cms: Duration::from_millis(150),
        }
    }
}

impl ComplianceLatencies {
    pub fn none() -> Self {
        Self {
            hipaa: Duration::ZERO,
            medical_necessity: Duration::ZERO,
            cms: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleBasedComplianceChecker {
    latencies: ComplianceLatencies,
}

impl RuleBasedComplianceChecker {
    pub fn new(latencies: ComplianceLatencies) -> Self {
        Self { latencies }
    }

    async fn check_hipaa(&self) -> ComplianceCheck {
        pause(self.latencies.hipaa).await;
        ComplianceCheck::new(
            "HIPAA_PRIVACY",
            true,
            "All patient identifiers are properly de-identified according to HIPAA Safe Harbor provisions",
            "HIPAA",
        )
    }

    async fn check_medical_necessity(&self, claim: &HealthcareClaim) -> ComplianceCheck {
        pause(self.latencies.medical_necessity).await;
        let established = claim.context_len() > MIN_NECESSITY_CONTEXT_CHARS;
        let verdict = if established {
            "established"
        } else {
            "requires additional documentation"
        };
        ComplianceCheck::new(
            "MEDICAL_NECESSITY",
            established,
            format!("Medical necessity {verdict} based on clinical context"),
            "CMS",
        )
    }

    async fn check_cms(&self) -> ComplianceCheck {
        pause(self.latencies.cms).await;
        ComplianceCheck::new(
            "CMS_GUIDELINES",
            true,
            "Procedure and diagnosis codes are valid and appropriately matched according to CMS guidelines",
            "CMS",
        )
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

impl DomainPort for RuleBasedComplianceChecker {}

#[async_trait]
impl HealthCheckable for RuleBasedComplianceChecker {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("rule-based-compliance", 0)
    }
}

#[async_trait]
impl ComplianceProvider for RuleBasedComplianceChecker {
    fn provider_name(&self) -> &str {
        "rule_based"
    }

    async fn validate_compliance(
        &self,
        claim: &HealthcareClaim,
        _reasoning: &str,
    ) -> Result<Vec<ComplianceCheck>, AiError> {
        let checks = vec![
            self.check_hipaa().await,
            self.check_medical_necessity(claim).await,
            self.check_cms().await,
        ];

        info!(
            claim_id = %claim.claim_id,
            checks_passed = checks.iter().filter(|c| c.passed).count(),
            total_checks = checks.len(),
            "Compliance validation completed"
        );

        Ok(checks)
    }
}
