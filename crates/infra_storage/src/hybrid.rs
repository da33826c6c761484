//! Hybrid claims store
//!
//! Implements [`ClaimsPort`] over a [`DocumentStore`] and a [`MetadataStore`].
//!
//! # Write path
//!
//! The full JSON document is written first, then the metadata record that
//! points at it. The two writes are not transactional: a crash between them
//! leaves an orphaned document, which is harmless because reads always start
//! from metadata.
//!
//! # Read path
//!
//! 1. Metadata lookup; missing or past its `ttl` reads as not found
//! 2. Document fetch via the stored path
//! 3. A missing claim document is rebuilt from metadata
//! 4. The metadata status always overrides the document status
//!
//! A claim that reached a terminal status keeps it; only a fresh
//! `store_claim` resets the lifecycle.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use core_kernel::temporal::{expiry_epoch, is_expired};
use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, ResultId,
};
use domain_claims::{ClaimStatus, ClaimsPort, HealthcareClaim, ValidationResult};

use crate::document::DocumentStore;
use crate::error::StorageError;
use crate::metadata::{ClaimMetadata, MetadataStore, ResultMetadata};

pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Document key for a claim
pub fn claim_document_key(claim_id: &ClaimId) -> String {
    format!("claims/{}.json", claim_id)
}

/// Document key for a validation result
///
/// Result ids are not unique across claims, so results are grouped per claim.
pub fn result_document_key(claim_id: &ClaimId, result_id: &ResultId) -> String {
    format!("results/{}/{}.json", claim_id, result_id)
}

pub struct HybridClaimsStore {
    documents: Arc<dyn DocumentStore>,
    metadata: Arc<dyn MetadataStore>,
    retention_days: u32,
}

impl HybridClaimsStore {
    pub fn new(documents: Arc<dyn DocumentStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            documents,
            metadata,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    fn ttl(&self) -> i64 {
        expiry_epoch(Utc::now(), self.retention_days)
    }

    async fn read_claim(&self, claim_id: &ClaimId) -> Result<Option<HealthcareClaim>, StorageError> {
        let Some(meta) = self.metadata.get_claim(claim_id).await? else {
            return Ok(None);
        };
        if is_expired(meta.ttl, Utc::now()) {
            debug!(claim_id = %claim_id, "Claim past retention, treating as absent");
            return Ok(None);
        }

        let mut claim = match self.documents.get(&meta.document_path).await? {
            Some(bytes) => serde_json::from_slice::<HealthcareClaim>(&bytes)?,
            None => {
                warn!(
                    claim_id = %claim_id,
                    document_path = %meta.document_path,
                    "Claim document missing, rebuilding from metadata"
                );
                meta.to_claim()
            }
        };
        claim.status = meta.status;
        Ok(Some(claim))
    }

    async fn read_result(&self, claim_id: &ClaimId) -> Result<Option<ValidationResult>, StorageError> {
        let Some(meta) = self.metadata.latest_result(claim_id).await? else {
            return Ok(None);
        };
        if is_expired(meta.ttl, Utc::now()) {
            return Ok(None);
        }

        match self.documents.get(&meta.document_path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => {
                warn!(
                    claim_id = %claim_id,
                    result_id = %meta.result_id,
                    "Validation result document missing"
                );
                Ok(None)
            }
        }
    }
}

fn log_failure(operation: &str, claim_id: &ClaimId, err: StorageError) -> PortError {
    error!(operation, claim_id = %claim_id, error = %err, "Storage operation failed");
    err.into()
}

impl DomainPort for HybridClaimsStore {}

#[async_trait]
impl HealthCheckable for HybridClaimsStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let documents = self.documents.health_check().await;
        let metadata = self.metadata.health_check().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let failures: Vec<String> = [&documents, &metadata]
            .into_iter()
            .filter(|r| r.status == AdapterHealth::Unhealthy)
            .map(|r| format!("{}: {}", r.adapter_id, r.message.as_deref().unwrap_or("unhealthy")))
            .collect();

        if failures.is_empty() {
            HealthCheckResult::healthy("hybrid-claims-store", latency_ms)
        } else {
            HealthCheckResult::unhealthy("hybrid-claims-store", latency_ms, failures.join("; "))
        }
    }
}

#[async_trait]
impl ClaimsPort for HybridClaimsStore {
    async fn store_claim(&self, claim: &HealthcareClaim) -> Result<(), PortError> {
        let key = claim_document_key(&claim.claim_id);
        let write = async {
            let body = serde_json::to_vec(claim)?;
            self.documents.put(&key, &body).await?;
            let record = ClaimMetadata::from_claim(claim, key.clone(), self.ttl());
            self.metadata.put_claim(&record).await
        };
        write
            .await
            .map_err(|e| log_failure("store_claim", &claim.claim_id, e))?;

        info!(claim_id = %claim.claim_id, status = %claim.status, "Claim stored");
        Ok(())
    }

    async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<HealthcareClaim>, PortError> {
        self.read_claim(claim_id)
            .await
            .map_err(|e| log_failure("get_claim", claim_id, e))
    }

    async fn update_claim_status(
        &self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<(), PortError> {
        let current = self
            .metadata
            .get_claim(claim_id)
            .await
            .map_err(|e| log_failure("update_claim_status", claim_id, e))?
            .ok_or_else(|| PortError::not_found("Claim", claim_id))?;

        if current.status.is_terminal() && current.status != status {
            warn!(
                claim_id = %claim_id,
                current = %current.status,
                requested = %status,
                "Rejected status change on decided claim"
            );
            return Err(PortError::validation(format!(
                "Claim {} already has final status {}",
                claim_id, current.status
            )));
        }

        let updated = self
            .metadata
            .update_claim_status(claim_id, status)
            .await
            .map_err(|e| log_failure("update_claim_status", claim_id, e))?;

        if !updated {
            return Err(PortError::not_found("Claim", claim_id));
        }
        info!(claim_id = %claim_id, status = %status, "Claim status updated");
        Ok(())
    }

    async fn store_validation_result(&self, result: &ValidationResult) -> Result<(), PortError> {
        let key = result_document_key(&result.claim_id, &result.result_id);
        let write = async {
            let body = serde_json::to_vec(result)?;
            self.documents.put(&key, &body).await?;
            let record = ResultMetadata::from_result(result, key.clone(), self.ttl());
            self.metadata.put_result(&record).await
        };
        write
            .await
            .map_err(|e| log_failure("store_validation_result", &result.claim_id, e))?;

        info!(
            claim_id = %result.claim_id,
            result_id = %result.result_id,
            validation_status = %result.validation_status,
            "Validation result stored"
        );
        Ok(())
    }

    async fn get_validation_result(
        &self,
        claim_id: &ClaimId,
    ) -> Result<Option<ValidationResult>, PortError> {
        self.read_result(claim_id)
            .await
            .map_err(|e| log_failure("get_validation_result", claim_id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keys() {
        let claim_id: ClaimId = "CLAIM_20250826_001".parse().unwrap();
        let result_id = ResultId::for_claim(&claim_id);
        assert_eq!(claim_document_key(&claim_id), "claims/CLAIM_20250826_001.json");
        assert!(result_document_key(&claim_id, &result_id)
            .starts_with("results/CLAIM_20250826_001/RESULT_"));
    }
}
