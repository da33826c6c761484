//! Comprehensive tests for domain_claims

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, Money, PortError};

use domain_claims::claim::{default_max_claim_amount, ClaimPriority, ClaimStatus, HealthcareClaim};
use domain_claims::metrics::{BaselineConstants, BusinessMetricsCalculator};
use domain_claims::ports::mock::MockClaimsPort;
use domain_claims::ports::ClaimsPort;
use domain_claims::progress::{ProcessingProgress, ProcessingStage};
use domain_claims::submission::ClaimSubmission;
use domain_claims::validation::{
    ComplianceCheck, ValidationOutcome, ValidationResult, ValidationStatus,
};

fn create_test_claim() -> HealthcareClaim {
    HealthcareClaim {
        claim_id: ClaimId::generate(),
        patient_id: "DEMO_PATIENT_042".to_string(),
        provider_id: "PROV_7".to_string(),
        service_date: Utc::now() - Duration::days(3),
        procedure_code: "99214".to_string(),
        diagnosis_code: "K21.9".to_string(),
        claim_amount: Money::new(dec!(350.00)),
        status: ClaimStatus::Submitted,
        submitted_at: Utc::now() - Duration::minutes(5),
        priority: ClaimPriority::Routine,
        medical_necessity_context: Some("Persistent reflux symptoms".to_string()),
        supporting_documents: None,
    }
}

fn create_result(claim: &HealthcareClaim, status: ValidationStatus, confidence: f64) -> ValidationResult {
    let metrics = BusinessMetricsCalculator::default().calculate(claim, confidence);
    ValidationResult::new(
        &claim.claim_id,
        ValidationOutcome {
            validation_status: status,
            confidence_score: confidence,
            ai_reasoning_text: "Medical necessity is clearly established.".to_string(),
            compliance_checks: vec![ComplianceCheck::new(
                "HIPAA_PRIVACY",
                true,
                "De-identified data used",
                "HIPAA",
            )],
            business_metrics: metrics,
            processing_time_ms: 1500,
        },
    )
    .unwrap()
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_valid_claim() {
        assert!(create_test_claim().validate_with_limit(default_max_claim_amount()).is_ok());
    }

    #[test]
    fn test_amount_boundaries() {
        let mut claim = create_test_claim();
        claim.claim_amount = Money::new(dec!(50000));
        assert!(claim.validate_with_limit(default_max_claim_amount()).is_ok());

        claim.claim_amount = Money::new(dec!(50000.01));
        let err = claim.validate_with_limit(default_max_claim_amount()).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));

        claim.claim_amount = Money::zero();
        assert!(claim.validate_with_limit(default_max_claim_amount()).is_err());
    }

    #[test]
    fn test_future_service_date_rejected() {
        let mut claim = create_test_claim();
        claim.service_date = Utc::now() + Duration::days(1);
        let err = claim.validate_with_limit(default_max_claim_amount()).unwrap_err();
        assert!(err.violations()[0].starts_with("service_date"));
    }

    #[test]
    fn test_code_formats() {
        let mut claim = create_test_claim();
        claim.procedure_code = "9921".to_string();
        claim.provider_id = "PROVIDER_1".to_string();
        let err = claim.validate_with_limit(default_max_claim_amount()).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_high_priority() {
        let mut claim = create_test_claim();
        assert!(!claim.is_high_priority());
        claim.priority = ClaimPriority::Urgent;
        assert!(claim.is_high_priority());
    }

    #[test]
    fn test_estimated_cost_urgent_long_context() {
        let mut claim = create_test_claim();
        claim.priority = ClaimPriority::Urgent;
        claim.medical_necessity_context = Some("a".repeat(600));
        assert_eq!(claim.estimated_processing_cost().amount(), dec!(0.084));
    }

    #[test]
    fn test_claim_round_trips_through_json() {
        let claim = create_test_claim();
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["status"], "submitted");
        assert_eq!(json["priority"], "routine");
        let back: HealthcareClaim = serde_json::from_value(json).unwrap();
        assert_eq!(back, claim);
    }
}

// ============================================================================
// Submission Tests
// ============================================================================

mod submission_tests {
    use super::*;

    fn submission() -> ClaimSubmission {
        ClaimSubmission {
            claim_id: Some("CLAIM_20240115_001".to_string()),
            patient_id: "DEMO_PATIENT_001".to_string(),
            provider_id: "PROV_001".to_string(),
            service_date: "2024-01-15T10:00:00Z".to_string(),
            procedure_code: "99213".to_string(),
            diagnosis_code: "Z00.00".to_string(),
            claim_amount: dec!(150),
            status: None,
            submitted_at: None,
            priority: ClaimPriority::Routine,
            medical_necessity_context: None,
            supporting_documents: None,
        }
    }

    #[test]
    fn test_keeps_supplied_claim_id() {
        let claim = submission().into_claim(default_max_claim_amount()).unwrap();
        assert_eq!(claim.claim_id.as_str(), "CLAIM_20240115_001");
    }

    #[test]
    fn test_diagnosis_with_two_decimals_rejected() {
        // Z00.00 has two digits after the dot
        let err = submission().into_claim(default_max_claim_amount()).err();
        assert!(err.is_some());
    }

    #[test]
    fn test_configured_cap_applies() {
        let mut s = submission();
        s.diagnosis_code = "Z00.0".to_string();
        s.claim_amount = dec!(1500);
        assert!(s.clone().into_claim(Money::new(dec!(1000))).is_err());
        assert!(s.into_claim(default_max_claim_amount()).is_ok());
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let json = r#"{"patient_id": "DEMO_PATIENT_001"}"#;
        assert!(serde_json::from_str::<ClaimSubmission>(json).is_err());
    }
}

// ============================================================================
// Validation Result Tests
// ============================================================================

mod validation_result_tests {
    use super::*;

    #[test]
    fn test_cost_reduction_matches_metrics() {
        let claim = create_test_claim();
        let result = create_result(&claim, ValidationStatus::Approved, 88.0);
        assert_eq!(result.cost_reduction, result.business_metrics.manual_review_cost_avoided);
        assert_eq!(result.cost_reduction.amount(), dec!(19.95));
    }

    #[test]
    fn test_result_id_tracks_claim_sequence() {
        let claim = create_test_claim();
        let result = create_result(&claim, ValidationStatus::Approved, 88.0);
        assert_eq!(result.result_id.sequence(), claim.claim_id.sequence());
    }

    #[test]
    fn test_claim_status_mapping() {
        let claim = create_test_claim();
        assert_eq!(
            create_result(&claim, ValidationStatus::Approved, 88.0).claim_status(),
            ClaimStatus::Approved
        );
        assert_eq!(
            create_result(&claim, ValidationStatus::PartialApproval, 80.0).claim_status(),
            ClaimStatus::Approved
        );
        assert_eq!(
            create_result(&claim, ValidationStatus::ComplianceViolation, 91.2).claim_status(),
            ClaimStatus::Denied
        );
        assert_eq!(
            create_result(&claim, ValidationStatus::InsufficientData, 90.0).claim_status(),
            ClaimStatus::RequiresHumanReview
        );
        assert_eq!(
            create_result(&claim, ValidationStatus::Approved, 65.8).claim_status(),
            ClaimStatus::RequiresHumanReview
        );
    }

    #[test]
    fn test_executive_summary_for_denial() {
        let claim = create_test_claim();
        let summary = create_result(&claim, ValidationStatus::Denied, 91.2).executive_summary();
        assert_eq!(summary.status, "denied");
        assert_eq!(summary.recommendation, "Requires Review");
        assert_eq!(summary.processing_time, "1.5s");
        assert!(summary.compliance_passed);
    }
}

// ============================================================================
// Business Metrics Tests
// ============================================================================

mod metrics_tests {
    use super::*;

    #[test]
    fn test_default_baselines() {
        let claim = create_test_claim();
        let metrics = BusinessMetricsCalculator::default().calculate(&claim, 88.0);
        assert_eq!(metrics.manual_review_cost_avoided.amount(), dec!(19.95));
        assert_eq!(metrics.processing_time_reduction, 99.9);
        assert!((metrics.accuracy_improvement - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_floor_and_cap() {
        let claim = create_test_claim();
        let calc = BusinessMetricsCalculator::default();
        assert_eq!(calc.calculate(&claim, 50.0).accuracy_improvement, 0.0);
        assert_eq!(calc.calculate(&claim, 100.0).accuracy_improvement, 17.5);

        let lenient = BusinessMetricsCalculator::new(BaselineConstants {
            manual_consistency: 60.0,
            ..Default::default()
        });
        assert_eq!(lenient.calculate(&claim, 100.0).accuracy_improvement, 25.0);
    }

    #[test]
    fn test_cost_avoided_never_negative() {
        let claim = create_test_claim();
        let calc = BusinessMetricsCalculator::new(BaselineConstants {
            manual_review_cost: Money::new(dec!(0.01)),
            ..Default::default()
        });
        assert!(calc.calculate(&claim, 80.0).manual_review_cost_avoided.is_zero());
    }
}

// ============================================================================
// Progress Tests
// ============================================================================

mod progress_tests {
    use super::*;

    #[test]
    fn test_progress_serializes_snake_case() {
        let progress = ProcessingProgress::for_claim(ClaimStatus::AiReview, false);
        assert_eq!(progress.stage, ProcessingStage::AiReasoning);
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["stage"], "ai_reasoning");
        assert_eq!(json["estimated_remaining_seconds"], 60);
    }
}

// ============================================================================
// Mock Port Tests
// ============================================================================

mod mock_port_tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_update_status() {
        let port = MockClaimsPort::new();
        let claim = create_test_claim();
        port.store_claim(&claim).await.unwrap();
        port.update_claim_status(&claim.claim_id, ClaimStatus::AiReview).await.unwrap();

        let stored = port.get_claim(&claim.claim_id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::AiReview);
    }

    #[tokio::test]
    async fn test_terminal_status_is_final() {
        let port = MockClaimsPort::new();
        let claim = create_test_claim();
        port.store_claim(&claim).await.unwrap();
        port.update_claim_status(&claim.claim_id, ClaimStatus::RequiresHumanReview)
            .await
            .unwrap();

        let err = port
            .update_claim_status(&claim.claim_id, ClaimStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation { .. }));
        assert!(ClaimStatus::RequiresHumanReview.is_terminal());
        assert!(!ClaimStatus::AiReview.is_terminal());
    }

    #[tokio::test]
    async fn test_update_unknown_claim_is_not_found() {
        let port = MockClaimsPort::new();
        let err = port
            .update_claim_status(&ClaimId::generate(), ClaimStatus::Approved)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_latest_result_wins() {
        let claim = create_test_claim();
        let port = MockClaimsPort::with_claims(vec![claim.clone()]).await;

        let first = create_result(&claim, ValidationStatus::Denied, 91.2);
        let mut second = create_result(&claim, ValidationStatus::Approved, 82.5);
        second.created_at = first.created_at + Duration::seconds(5);

        port.store_validation_result(&second).await.unwrap();
        port.store_validation_result(&first).await.unwrap();

        let latest = port.get_validation_result(&claim.claim_id).await.unwrap().unwrap();
        assert_eq!(latest.validation_status, ValidationStatus::Approved);
        assert_eq!(port.result_count(&claim.claim_id).await, 2);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_metrics_within_bounds(confidence in -50.0f64..150.0f64, urgent in any::<bool>()) {
        let mut claim = create_test_claim();
        if urgent {
            claim.priority = ClaimPriority::Emergency;
        }
        let metrics = BusinessMetricsCalculator::default().calculate(&claim, confidence);
        prop_assert!(metrics.processing_time_reduction >= 0.0 && metrics.processing_time_reduction <= 100.0);
        prop_assert!(metrics.accuracy_improvement >= 0.0 && metrics.accuracy_improvement <= 25.0);
        prop_assert!(!metrics.manual_review_cost_avoided.amount().is_sign_negative());
    }

    #[test]
    fn prop_amounts_above_cap_rejected(cents in 5_000_001i64..100_000_000i64) {
        let mut claim = create_test_claim();
        claim.claim_amount = Money::new(Decimal::new(cents, 2));
        prop_assert!(claim.validate_with_limit(default_max_claim_amount()).is_err());
    }

    #[test]
    fn prop_confidence_always_in_range(confidence in -1000.0f64..1000.0f64) {
        let claim = create_test_claim();
        let result = create_result(&claim, ValidationStatus::Approved, confidence);
        prop_assert!(result.confidence_score >= 0.0 && result.confidence_score <= 100.0);
    }
}
