//! Tests for the document, metadata and hybrid claim stores

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{AdapterHealth, ClaimId, HealthCheckable, Money, PortError, ResultId};
use domain_claims::{
    BusinessMetrics, ClaimPriority, ClaimStatus, ClaimsPort, HealthcareClaim, ValidationOutcome,
    ValidationResult, ValidationStatus,
};
use infra_storage::document::validate_key;
use infra_storage::{
    claim_document_key, DocumentStore, FsDocumentStore, HybridClaimsStore, InMemoryDocumentStore,
    InMemoryMetadataStore, MetadataStore,
};

fn claim() -> HealthcareClaim {
    HealthcareClaim {
        claim_id: ClaimId::generate(),
        patient_id: "DEMO_PATIENT_001".to_string(),
        provider_id: "PROV_001".to_string(),
        service_date: Utc::now() - Duration::days(3),
        procedure_code: "99213".to_string(),
        diagnosis_code: "K21.9".to_string(),
        claim_amount: Money::new(dec!(150.00)),
        status: ClaimStatus::Submitted,
        submitted_at: Utc::now(),
        priority: ClaimPriority::Routine,
        medical_necessity_context: Some("Recurring reflux despite medication".to_string()),
        supporting_documents: Some(vec!["visit_notes.pdf".to_string()]),
    }
}

fn result_for(claim: &HealthcareClaim, confidence: f64) -> ValidationResult {
    ValidationResult::new(
        &claim.claim_id,
        ValidationOutcome {
            validation_status: ValidationStatus::Approved,
            confidence_score: confidence,
            ai_reasoning_text: "RECOMMENDATION: APPROVE".to_string(),
            compliance_checks: vec![],
            business_metrics: BusinessMetrics {
                manual_review_cost_avoided: Money::new(dec!(19.95)),
                processing_time_reduction: 99.9,
                accuracy_improvement: 0.0,
            },
            processing_time_ms: 1200,
        },
    )
    .unwrap()
}

struct Harness {
    documents: InMemoryDocumentStore,
    metadata: InMemoryMetadataStore,
    store: HybridClaimsStore,
}

fn memory_store() -> Harness {
    let documents = InMemoryDocumentStore::new();
    let metadata = InMemoryMetadataStore::new();
    let store = HybridClaimsStore::new(Arc::new(documents.clone()), Arc::new(metadata.clone()));
    Harness {
        documents,
        metadata,
        store,
    }
}

// ============================================================================
// Hybrid Store Tests
// ============================================================================

mod hybrid_tests {
    use super::*;

    #[tokio::test]
    async fn test_store_then_get_returns_full_document() {
        let h = memory_store();
        let c = claim();
        h.store.store_claim(&c).await.unwrap();

        let loaded = h.store.get_claim(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(loaded, c);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_none() {
        let h = memory_store();
        assert!(h.store.get_claim(&ClaimId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_status_overrides_document() {
        let h = memory_store();
        let c = claim();
        h.store.store_claim(&c).await.unwrap();
        h.store
            .update_claim_status(&c.claim_id, ClaimStatus::Approved)
            .await
            .unwrap();

        let loaded = h.store.get_claim(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ClaimStatus::Approved);
        assert_eq!(loaded.medical_necessity_context, c.medical_necessity_context);
    }

    #[tokio::test]
    async fn test_update_unknown_claim_is_not_found() {
        let h = memory_store();
        let err = h
            .store
            .update_claim_status(&ClaimId::generate(), ClaimStatus::Denied)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decided_claim_keeps_final_status() {
        let h = memory_store();
        let c = claim();
        h.store.store_claim(&c).await.unwrap();
        h.store
            .update_claim_status(&c.claim_id, ClaimStatus::Denied)
            .await
            .unwrap();

        let err = h
            .store
            .update_claim_status(&c.claim_id, ClaimStatus::Processing)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation { .. }));
        assert!(err.to_string().contains("denied"));

        // Re-applying the same decision is a no-op
        h.store
            .update_claim_status(&c.claim_id, ClaimStatus::Denied)
            .await
            .unwrap();
        let meta = h.metadata.get_claim(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(meta.status, ClaimStatus::Denied);
    }

    #[tokio::test]
    async fn test_restore_resets_decided_claim() {
        let h = memory_store();
        let mut c = claim();
        h.store.store_claim(&c).await.unwrap();
        h.store
            .update_claim_status(&c.claim_id, ClaimStatus::Approved)
            .await
            .unwrap();

        c.status = ClaimStatus::Processing;
        h.store.store_claim(&c).await.unwrap();
        h.store
            .update_claim_status(&c.claim_id, ClaimStatus::AiReview)
            .await
            .unwrap();
        let loaded = h.store.get_claim(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ClaimStatus::AiReview);
    }

    #[tokio::test]
    async fn test_missing_document_rebuilt_from_metadata() {
        let h = memory_store();
        let c = claim();
        h.store.store_claim(&c).await.unwrap();
        assert!(h.documents.delete(&claim_document_key(&c.claim_id)).await.unwrap());

        let loaded = h.store.get_claim(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(loaded.claim_id, c.claim_id);
        assert_eq!(loaded.claim_amount, c.claim_amount);
        assert!(loaded.medical_necessity_context.is_none());
    }

    #[tokio::test]
    async fn test_expired_records_read_as_absent() {
        let documents = InMemoryDocumentStore::new();
        let store = HybridClaimsStore::new(
            Arc::new(documents),
            Arc::new(InMemoryMetadataStore::new()),
        )
        .with_retention_days(0);

        let c = claim();
        store.store_claim(&c).await.unwrap();
        store.store_validation_result(&result_for(&c, 88.0)).await.unwrap();

        assert!(store.get_claim(&c.claim_id).await.unwrap().is_none());
        assert!(store.get_validation_result(&c.claim_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_result_wins() {
        let h = memory_store();
        let c = claim();
        h.store.store_claim(&c).await.unwrap();

        let mut older = result_for(&c, 60.0);
        older.result_id = ResultId::new(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(), 1);
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = result_for(&c, 91.0);

        h.store.store_validation_result(&newer).await.unwrap();
        h.store.store_validation_result(&older).await.unwrap();

        let latest = h.store.get_validation_result(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(latest.confidence_score, 91.0);
        assert_eq!(latest.result_id, newer.result_id);
    }

    #[tokio::test]
    async fn test_result_metadata_recorded() {
        let h = memory_store();
        let c = claim();
        let r = result_for(&c, 75.0);
        h.store.store_validation_result(&r).await.unwrap();

        let meta = h.metadata.latest_result(&c.claim_id).await.unwrap().unwrap();
        assert_eq!(meta.result_id, r.result_id);
        assert!(meta.document_path.starts_with("results/"));
        assert!(meta.ttl > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_health_check_is_healthy() {
        let h = memory_store();
        assert_eq!(h.store.health_check().await.status, AdapterHealth::Healthy);
    }
}

// ============================================================================
// Filesystem Document Store Tests
// ============================================================================

mod fs_tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let documents = FsDocumentStore::new(dir.path()).await.unwrap();
        let store = HybridClaimsStore::new(
            Arc::new(documents),
            Arc::new(InMemoryMetadataStore::new()),
        );

        let c = claim();
        store.store_claim(&c).await.unwrap();

        let path = dir.path().join(claim_document_key(&c.claim_id));
        assert!(path.exists());
        let on_disk: HealthcareClaim =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(on_disk.claim_id, c.claim_id);
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let documents = FsDocumentStore::new(dir.path()).await.unwrap();
        assert!(documents.get("claims/nothing.json").await.unwrap().is_none());
        assert!(!documents.delete("claims/nothing.json").await.unwrap());
    }

    #[tokio::test]
    async fn test_root_created_and_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/documents");
        let documents = FsDocumentStore::new(&root).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(documents.health_check().await.status, AdapterHealth::Healthy);
    }

    #[tokio::test]
    async fn test_escaping_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let documents = FsDocumentStore::new(dir.path()).await.unwrap();
        assert!(documents.put("../outside.json", b"{}").await.is_err());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_parent_segments_always_rejected(prefix in "[a-z]{1,8}", suffix in "[a-z]{1,8}") {
        let key = format!("{prefix}/../{suffix}.json");
        prop_assert!(validate_key(&key).is_err());
    }

    #[test]
    fn prop_plain_keys_accepted(dir in "[a-z]{1,8}", name in "[A-Z0-9_]{1,20}") {
        let key = format!("{dir}/{name}.json");
        prop_assert!(validate_key(&key).is_ok());
    }
}
