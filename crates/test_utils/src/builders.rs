//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::Utc;
use core_kernel::{ClaimId, Money};
use domain_claims::{ClaimPriority, ClaimStatus, HealthcareClaim};
use fake::faker::lorem::en::Sentence;
use fake::Fake;

use crate::fixtures::{MoneyFixtures, TemporalFixtures, DETAILED_CONTEXT};

/// Builder for constructing test claims
pub struct HealthcareClaimBuilder {
    claim: HealthcareClaim,
}

impl Default for HealthcareClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthcareClaimBuilder {
    /// Creates a standard-scenario claim with a detailed context
    pub fn new() -> Self {
        Self {
            claim: HealthcareClaim {
                claim_id: ClaimId::generate(),
                patient_id: "DEMO_PATIENT_001".to_string(),
                provider_id: "PROV_001".to_string(),
                service_date: TemporalFixtures::service_date(),
                procedure_code: "99213".to_string(),
                diagnosis_code: "K21.9".to_string(),
                claim_amount: MoneyFixtures::office_visit(),
                status: ClaimStatus::Submitted,
                submitted_at: Utc::now(),
                priority: ClaimPriority::Routine,
                medical_necessity_context: Some(DETAILED_CONTEXT.to_string()),
                supporting_documents: None,
            },
        }
    }

    /// Randomizes the de-identified patient and provider references
    pub fn with_random_parties(mut self) -> Self {
        let patient: u32 = (1..1000).fake();
        let provider: u32 = (1..100).fake();
        self.claim.patient_id = format!("DEMO_PATIENT_{patient:03}");
        self.claim.provider_id = format!("PROV_{provider:03}");
        self
    }

    /// Replaces the context with random filler text of 4-12 words
    pub fn with_random_context(mut self) -> Self {
        self.claim.medical_necessity_context = Some(Sentence(4..12).fake());
        self
    }

    pub fn with_procedure_code(mut self, code: impl Into<String>) -> Self {
        self.claim.procedure_code = code.into();
        self
    }

    pub fn with_diagnosis_code(mut self, code: impl Into<String>) -> Self {
        self.claim.diagnosis_code = code.into();
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.claim.claim_amount = amount;
        self
    }

    pub fn with_context(mut self, context: Option<&str>) -> Self {
        self.claim.medical_necessity_context = context.map(str::to_string);
        self
    }

    pub fn build(self) -> HealthcareClaim {
        self.claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_claim_is_valid() {
        let claim = HealthcareClaimBuilder::new().with_random_parties().build();
        assert!(claim.validate_with_limit(MoneyFixtures::claim_cap()).is_ok());
    }

    #[test]
    fn test_random_context_is_filled() {
        let claim = HealthcareClaimBuilder::new().with_random_context().build();
        assert!(claim.context_len() > 0);
    }
}
