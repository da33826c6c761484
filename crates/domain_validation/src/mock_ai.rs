//! Scenario-driven mock AI providers for demo mode
//!
//! Both providers resolve the same [`ScenarioKind`] for a claim, so the
//! reasoning and the compliance checks always tell one story.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable};
use domain_claims::{ComplianceCheck, HealthcareClaim};

use crate::error::AiError;
use crate::ports::{ComplianceProvider, MedicalReasoning, ReasoningProvider};
use crate::scenarios::{select_scenario, ScenarioKind};

const MIN_DELAY_MS: u64 = 800;
const MAX_DELAY_MS: u64 = 2200;

/// Mock behavior shared by both providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockAiConfig {
    /// Sleep a random 800-2200 ms per reasoning call
    pub realistic_delays: bool,
    /// Use this scenario for every claim
    pub pinned_scenario: Option<ScenarioKind>,
}

impl MockAiConfig {
    pub fn pinned(scenario: ScenarioKind) -> Self {
        Self {
            realistic_delays: false,
            pinned_scenario: Some(scenario),
        }
    }

    pub fn scenario_for(&self, claim: &HealthcareClaim) -> ScenarioKind {
        self.pinned_scenario.unwrap_or_else(|| select_scenario(claim))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockReasoningProvider {
    config: MockAiConfig,
}

impl MockReasoningProvider {
    pub fn new(config: MockAiConfig) -> Self {
        Self { config }
    }
}

impl DomainPort for MockReasoningProvider {}

#[async_trait]
impl HealthCheckable for MockReasoningProvider {
    async fn health_check(&self) -> HealthCheckResult {
        let mut result = HealthCheckResult::healthy("mock-reasoning", 0);
        result.message = Some("Mock AI mode".to_string());
        result
    }
}

#[async_trait]
impl ReasoningProvider for MockReasoningProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn medical_reasoning(&self, claim: &HealthcareClaim) -> Result<MedicalReasoning, AiError> {
        let scenario = self.config.scenario_for(claim);
        let template = scenario.template();

        if self.config.realistic_delays {
            let delay_ms = rand::thread_rng().gen_range(MIN_DELAY_MS..=MAX_DELAY_MS);
            debug!(claim_id = %claim.claim_id, delay_ms, "Simulating model latency");
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        info!(
            claim_id = %claim.claim_id,
            scenario = %scenario,
            scenario_name = template.name,
            "Mock medical reasoning generated"
        );

        Ok(MedicalReasoning {
            text: template.render_reasoning(claim),
            confidence: template.confidence,
            status: template.status,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockComplianceProvider {
    config: MockAiConfig,
}

impl MockComplianceProvider {
    pub fn new(config: MockAiConfig) -> Self {
        Self { config }
    }
}

impl DomainPort for MockComplianceProvider {}

#[async_trait]
impl HealthCheckable for MockComplianceProvider {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("mock-compliance", 0)
    }
}

#[async_trait]
impl ComplianceProvider for MockComplianceProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn validate_compliance(
        &self,
        claim: &HealthcareClaim,
        _reasoning: &str,
    ) -> Result<Vec<ComplianceCheck>, AiError> {
        Ok(self.config.scenario_for(claim).template().compliance_checks())
    }
}
