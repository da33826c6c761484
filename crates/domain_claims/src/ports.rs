//! Claims Domain Port
//!
//! `ClaimsPort` is everything the claims workflow needs from persistence:
//! claim documents, status updates and validation results. The production
//! adapter (`infra_storage::HybridClaimsStore`) splits each record between a
//! document store and a metadata table; the mock adapter below keeps
//! everything in memory.
//!
//! ```rust,ignore
//! pub struct ClaimsService {
//!     claims: Arc<dyn ClaimsPort>,
//! }
//!
//! impl ClaimsService {
//!     pub async fn status(&self, id: &ClaimId) -> Result<Option<HealthcareClaim>, PortError> {
//!         self.claims.get_claim(id).await
//!     }
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::{ClaimStatus, HealthcareClaim};
use crate::validation::ValidationResult;

/// Port for claim and validation-result persistence
#[async_trait]
pub trait ClaimsPort: DomainPort + HealthCheckable {
    /// Stores a claim, replacing any previous version with the same id
    async fn store_claim(&self, claim: &HealthcareClaim) -> Result<(), PortError>;

    /// Retrieves a claim; `None` when unknown or past retention
    async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<HealthcareClaim>, PortError>;

    /// Updates only the claim status
    ///
    /// Fails with [`PortError::Validation`] when the claim already holds a
    /// different terminal status.
    async fn update_claim_status(
        &self,
        claim_id: &ClaimId,
        status: ClaimStatus,
    ) -> Result<(), PortError>;

    /// Stores a validation result
    async fn store_validation_result(&self, result: &ValidationResult) -> Result<(), PortError>;

    /// Retrieves the most recent validation result for a claim
    async fn get_validation_result(
        &self,
        claim_id: &ClaimId,
    ) -> Result<Option<ValidationResult>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of ClaimsPort
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimsPort {
        claims: Arc<RwLock<HashMap<ClaimId, HealthcareClaim>>>,
        results: Arc<RwLock<HashMap<ClaimId, Vec<ValidationResult>>>>,
    }

    impl MockClaimsPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims for testing
        pub async fn with_claims(claims: Vec<HealthcareClaim>) -> Self {
            let port = Self::new();
            for claim in claims {
                port.claims.write().await.insert(claim.claim_id.clone(), claim);
            }
            port
        }

        /// Number of results stored for a claim
        pub async fn result_count(&self, claim_id: &ClaimId) -> usize {
            self.results
                .read()
                .await
                .get(claim_id)
                .map(Vec::len)
                .unwrap_or(0)
        }
    }

    impl DomainPort for MockClaimsPort {}

    #[async_trait]
    impl HealthCheckable for MockClaimsPort {
        async fn health_check(&self) -> HealthCheckResult {
            let mut result = HealthCheckResult::healthy("mock-claims-port", 0);
            result.message = Some("Mock adapter always healthy".to_string());
            result
        }
    }

    #[async_trait]
    impl ClaimsPort for MockClaimsPort {
        async fn store_claim(&self, claim: &HealthcareClaim) -> Result<(), PortError> {
            self.claims
                .write()
                .await
                .insert(claim.claim_id.clone(), claim.clone());
            Ok(())
        }

        async fn get_claim(&self, claim_id: &ClaimId) -> Result<Option<HealthcareClaim>, PortError> {
            Ok(self.claims.read().await.get(claim_id).cloned())
        }

        async fn update_claim_status(
            &self,
            claim_id: &ClaimId,
            status: ClaimStatus,
        ) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            if claim.status.is_terminal() && claim.status != status {
                return Err(PortError::validation(format!(
                    "Claim {} already has final status {}",
                    claim_id, claim.status
                )));
            }
            claim.update_status(status);
            Ok(())
        }

        async fn store_validation_result(&self, result: &ValidationResult) -> Result<(), PortError> {
            self.results
                .write()
                .await
                .entry(result.claim_id.clone())
                .or_default()
                .push(result.clone());
            Ok(())
        }

        async fn get_validation_result(
            &self,
            claim_id: &ClaimId,
        ) -> Result<Option<ValidationResult>, PortError> {
            Ok(self
                .results
                .read()
                .await
                .get(claim_id)
                .and_then(|results| results.iter().max_by_key(|r| r.created_at).cloned()))
        }
    }
}
