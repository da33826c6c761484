//! Tests for AI validation providers and the orchestrator

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{
    ClaimId, DomainPort, HealthCheckResult, HealthCheckable, Money, OperationMetadata, SessionId,
};
use domain_claims::{
    ClaimPriority, ClaimStatus, ComplianceCheck, HealthcareClaim, ValidationStatus,
};
use domain_cost::{CostTracker, CostType};
use domain_validation::{
    select_scenario, AiError, ClaimValidationOrchestrator, ComplianceLatencies, ComplianceProvider,
    MedicalReasoning, MockAiConfig, MockComplianceProvider, MockReasoningProvider,
    ReasoningProvider, RuleBasedComplianceChecker, ScenarioKind,
};
use test_utils::{
    assert_confidence_in_range, assert_money_approx_eq, assert_review_flag_consistent,
    claim_strategy, raw_confidence_strategy, MoneyFixtures,
};

fn claim(procedure: &str, amount: rust_decimal::Decimal, context: Option<&str>) -> HealthcareClaim {
    HealthcareClaim {
        claim_id: ClaimId::generate(),
        patient_id: "DEMO_PATIENT_001".to_string(),
        provider_id: "PROV_001".to_string(),
        service_date: Utc::now() - Duration::days(2),
        procedure_code: procedure.to_string(),
        diagnosis_code: "K21.9".to_string(),
        claim_amount: Money::new(amount),
        status: ClaimStatus::Submitted,
        submitted_at: Utc::now(),
        priority: ClaimPriority::Routine,
        medical_necessity_context: context.map(str::to_string),
        supporting_documents: None,
    }
}

fn session() -> SessionId {
    "TEST_SESSION".parse().unwrap()
}

fn mock_orchestrator(config: MockAiConfig) -> ClaimValidationOrchestrator {
    ClaimValidationOrchestrator::new(
        Arc::new(MockReasoningProvider::new(config)),
        Arc::new(MockComplianceProvider::new(config)),
        Arc::new(CostTracker::default()),
    )
}

/// Provider that fails every call
struct UnavailableProvider;

impl DomainPort for UnavailableProvider {}

#[async_trait]
impl HealthCheckable for UnavailableProvider {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::unhealthy("unavailable", 0, "always down")
    }
}

#[async_trait]
impl ReasoningProvider for UnavailableProvider {
    fn provider_name(&self) -> &str {
        "unavailable"
    }

    async fn medical_reasoning(&self, _claim: &HealthcareClaim) -> Result<MedicalReasoning, AiError> {
        Err(AiError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

#[async_trait]
impl ComplianceProvider for UnavailableProvider {
    fn provider_name(&self) -> &str {
        "unavailable"
    }

    async fn validate_compliance(
        &self,
        _claim: &HealthcareClaim,
        _reasoning: &str,
    ) -> Result<Vec<ComplianceCheck>, AiError> {
        Err(AiError::Timeout(120))
    }
}

// ============================================================================
// Scenario Selection Tests
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_office_visit_under_500_is_standard() {
        assert_eq!(select_scenario(&claim("99213", dec!(150), None)), ScenarioKind::Standard);
    }

    #[test]
    fn test_office_visit_at_500_is_complex() {
        assert_eq!(select_scenario(&claim("99214", dec!(500), None)), ScenarioKind::Complex);
    }

    #[test]
    fn test_zero_prefix_is_preventive() {
        assert_eq!(select_scenario(&claim("0001U", dec!(5000), None)), ScenarioKind::Preventive);
    }

    #[test]
    fn test_expensive_other_code_is_complex() {
        assert_eq!(select_scenario(&claim("45378", dec!(1000.01), None)), ScenarioKind::Complex);
        assert_eq!(select_scenario(&claim("45378", dec!(1000), None)), ScenarioKind::Standard);
    }

    #[test]
    fn test_rendered_reasoning_mentions_codes() {
        let c = claim("99213", dec!(150), None);
        let text = ScenarioKind::Standard.template().render_reasoning(&c);
        assert!(text.contains("Procedure 99213 for diagnosis K21.9"));
        assert!(text.contains("Gastroesophageal reflux disease without esophagitis"));
        assert!(!text.contains('{'));
    }
}

// ============================================================================
// Rule-Based Compliance Tests
// ============================================================================

mod compliance_tests {
    use super::*;

    #[tokio::test]
    async fn test_detailed_context_passes_all_checks() {
        let checker = RuleBasedComplianceChecker::new(ComplianceLatencies::none());
        let c = claim(
            "99213",
            dec!(150),
            Some("Persistent reflux symptoms for six weeks despite lifestyle changes and antacids"),
        );
        let checks = checker.validate_compliance(&c, "").await.unwrap();

        assert_eq!(checks.len(), 3);
        assert!(checks.iter().all(|c| c.passed));
        assert_eq!(checks[0].check_type, "HIPAA_PRIVACY");
        assert_eq!(checks[0].regulatory_framework, "HIPAA");
        assert_eq!(checks[1].details, "Medical necessity established based on clinical context");
    }

    #[tokio::test]
    async fn test_short_context_fails_medical_necessity() {
        let checker = RuleBasedComplianceChecker::new(ComplianceLatencies::none());
        let c = claim("99213", dec!(150), Some("Follow-up visit"));
        let checks = checker.validate_compliance(&c, "").await.unwrap();

        let necessity = checks.iter().find(|c| c.check_type == "MEDICAL_NECESSITY").unwrap();
        assert!(!necessity.passed);
        assert_eq!(
            necessity.details,
            "Medical necessity requires additional documentation based on clinical context"
        );
    }
}

// ============================================================================
// Orchestrator Tests
// ============================================================================

mod orchestrator_tests {
    use super::*;

    #[tokio::test]
    async fn test_standard_claim_is_approved() {
        let orchestrator = mock_orchestrator(MockAiConfig::default());
        let c = claim("99213", dec!(150), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        assert_eq!(result.claim_id, c.claim_id);
        assert_eq!(result.validation_status, ValidationStatus::Approved);
        assert_eq!(result.confidence_score, 82.5);
        assert_eq!(result.compliance_checks.len(), 4);
        assert!(!result.requires_human_review);
        assert_eq!(result.claim_status(), ClaimStatus::Approved);
        assert_money_approx_eq(
            &result.cost_reduction,
            &(MoneyFixtures::manual_review() - c.estimated_processing_cost()),
            dec!(0.001),
        );
        assert!(result.processing_time_ms >= 1);
    }

    #[tokio::test]
    async fn test_costs_are_booked_to_session() {
        let orchestrator = mock_orchestrator(MockAiConfig::default());
        let c = claim("99213", dec!(150), None);
        orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        let breakdown = orchestrator.cost_tracker().session_breakdown(&session()).await;
        assert_eq!(breakdown.claims_processed, 1);
        assert_eq!(breakdown.operations.len(), 2);
        assert_money_approx_eq(
            &breakdown.costs_by_type[&CostType::Compliance],
            &Money::new(dec!(0.40)),
            dec!(0.0001),
        );
        assert!(breakdown.costs_by_type[&CostType::Reasoning].amount() > dec!(0.03));
    }

    #[tokio::test]
    async fn test_complex_claim_requires_review() {
        let orchestrator = mock_orchestrator(MockAiConfig::default());
        let c = claim("99215", dec!(750), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        assert_eq!(result.confidence_score, 65.8);
        assert!(result.requires_human_review);
        assert_review_flag_consistent(&result);
        assert_eq!(result.claim_status(), ClaimStatus::RequiresHumanReview);
    }

    #[tokio::test]
    async fn test_pinned_experimental_scenario() {
        let orchestrator = mock_orchestrator(MockAiConfig::pinned(ScenarioKind::Experimental));
        let c = claim("99213", dec!(150), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        assert_eq!(result.validation_status, ValidationStatus::Denied);
        assert_eq!(result.confidence_score, 91.2);
        // Prior authorization and benefit coverage fail
        assert!(result.requires_human_review);
        assert_review_flag_consistent(&result);
        assert!(result.ai_reasoning_text.contains("RECOMMENDATION: DENY"));
    }

    #[tokio::test]
    async fn test_reasoning_failure_falls_back() {
        let tracker = Arc::new(CostTracker::default());
        let orchestrator = ClaimValidationOrchestrator::new(
            Arc::new(UnavailableProvider),
            Arc::new(MockComplianceProvider::default()),
            tracker.clone(),
        );
        let c = claim("99213", dec!(150), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::with_correlation_id("req-1"))
            .await
            .unwrap();

        assert_eq!(result.confidence_score, 50.0);
        assert_eq!(result.validation_status, ValidationStatus::RequiresHumanReview);
        assert!(result.requires_human_review);
        assert!(result.ai_reasoning_text.contains("FALLBACK MEDICAL REASONING"));
        assert!(result.ai_reasoning_text.contains("Limited clinical context provided"));

        let breakdown = tracker.session_breakdown(&session()).await;
        assert_eq!(breakdown.costs_by_type[&CostType::ReasoningFailed].amount(), dec!(0.01));
    }

    #[tokio::test]
    async fn test_compliance_failure_falls_back() {
        let tracker = Arc::new(CostTracker::default());
        let orchestrator = ClaimValidationOrchestrator::new(
            Arc::new(MockReasoningProvider::default()),
            Arc::new(UnavailableProvider),
            tracker.clone(),
        );
        let c = claim("99213", dec!(150), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        assert_eq!(result.compliance_checks.len(), 1);
        assert_eq!(result.compliance_checks[0].check_type, "FALLBACK_COMPLIANCE");
        assert!(result.compliance_checks[0].passed);
        assert!(!result.requires_human_review);

        let breakdown = tracker.session_breakdown(&session()).await;
        assert_eq!(breakdown.costs_by_type[&CostType::ComplianceFailed].amount(), dec!(0.05));
    }

    #[tokio::test]
    async fn test_rule_based_checker_with_mock_reasoning() {
        let orchestrator = ClaimValidationOrchestrator::new(
            Arc::new(MockReasoningProvider::default()),
            Arc::new(RuleBasedComplianceChecker::new(ComplianceLatencies::none())),
            Arc::new(CostTracker::default()),
        );
        let c = claim("99213", dec!(150), None);

        let result = orchestrator
            .validate_claim(&c, &session(), &OperationMetadata::default())
            .await
            .unwrap();

        // No context, so medical necessity is not established
        assert_eq!(result.compliance_checks.len(), 3);
        assert!(result.requires_human_review);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_extracted_confidence_in_range(value in 0.0f64..100_000.0) {
        let score = domain_validation::extract_confidence(&format!("Confidence: {value:.2}"));
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn prop_scenario_selection_is_deterministic(c in claim_strategy()) {
        prop_assert_eq!(select_scenario(&c), select_scenario(&c));
    }

    #[test]
    fn prop_stated_confidence_is_clamped(value in raw_confidence_strategy()) {
        let score = domain_validation::extract_confidence(&format!("Confidence: {value:.1}"));
        assert_confidence_in_range(score);
    }
}
