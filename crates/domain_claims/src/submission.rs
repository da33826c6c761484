//! Inbound claim submissions
//!
//! Clients send snake_case or camelCase field names and may omit the claim
//! id, status and submission timestamp. Parsing collects every problem
//! before giving up so the caller sees all violations in one response.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::parse_timestamp;
use core_kernel::{ClaimId, Money};
use crate::claim::{ClaimPriority, ClaimStatus, HealthcareClaim};
use crate::error::ClaimError;

/// Raw claim submission as received over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    #[serde(default, alias = "claimId")]
    pub claim_id: Option<String>,
    #[serde(alias = "patientId")]
    pub patient_id: String,
    #[serde(alias = "providerId")]
    pub provider_id: String,
    #[serde(alias = "serviceDate")]
    pub service_date: String,
    #[serde(alias = "procedureCode")]
    pub procedure_code: String,
    #[serde(alias = "diagnosisCode")]
    pub diagnosis_code: String,
    #[serde(alias = "claimAmount")]
    pub claim_amount: Decimal,
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default, alias = "submittedAt")]
    pub submitted_at: Option<String>,
    pub priority: ClaimPriority,
    #[serde(default, alias = "medicalNecessityContext")]
    pub medical_necessity_context: Option<String>,
    #[serde(default, alias = "supportingDocuments")]
    pub supporting_documents: Option<Vec<String>>,
}

impl ClaimSubmission {
    /// Converts into a validated claim, generating the id and timestamp when absent
    pub fn into_claim(self, max_amount: Money) -> Result<HealthcareClaim, ClaimError> {
        let mut violations = Vec::new();

        let claim_id = match self.claim_id.as_deref() {
            None | Some("") => Some(ClaimId::generate()),
            Some(raw) => raw
                .parse::<ClaimId>()
                .map_err(|e| violations.push(format!("claim_id: {e}")))
                .ok(),
        };

        let service_date = parse_timestamp(&self.service_date)
            .map_err(|e| violations.push(format!("service_date: {e}")))
            .ok();

        let submitted_at = match self.submitted_at.as_deref() {
            None | Some("") => Some(Utc::now()),
            Some(raw) => parse_timestamp(raw)
                .map_err(|e| violations.push(format!("submitted_at: {e}")))
                .ok(),
        };

        let (Some(claim_id), Some(service_date), Some(submitted_at)) =
            (claim_id, service_date, submitted_at)
        else {
            return Err(ClaimError::Validation(violations));
        };

        let claim = HealthcareClaim {
            claim_id,
            patient_id: self.patient_id,
            provider_id: self.provider_id,
            service_date,
            procedure_code: self.procedure_code,
            diagnosis_code: self.diagnosis_code,
            claim_amount: Money::new(self.claim_amount),
            status: self.status.unwrap_or(ClaimStatus::Submitted),
            submitted_at,
            priority: self.priority,
            medical_necessity_context: self.medical_necessity_context,
            supporting_documents: self.supporting_documents,
        };

        claim.validate_with_limit(max_amount)?;
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::default_max_claim_amount;

    #[test]
    fn test_camel_case_aliases() {
        let json = r#"{
            "patientId": "DEMO_PATIENT_001",
            "providerId": "PROV_001",
            "serviceDate": "2024-01-15",
            "procedureCode": "99213",
            "diagnosisCode": "K21.9",
            "claimAmount": 250.0,
            "priority": "routine"
        }"#;
        let submission: ClaimSubmission = serde_json::from_str(json).unwrap();
        let claim = submission.into_claim(default_max_claim_amount()).unwrap();
        assert!(ClaimId::is_valid(claim.claim_id.as_str()));
        assert_eq!(claim.status, ClaimStatus::Submitted);
    }

    #[test]
    fn test_bad_dates_and_id_reported_together() {
        let json = r#"{
            "claim_id": "BAD",
            "patient_id": "DEMO_PATIENT_001",
            "provider_id": "PROV_001",
            "service_date": "invalid-date",
            "procedure_code": "99213",
            "diagnosis_code": "K21.9",
            "claim_amount": 250,
            "priority": "urgent"
        }"#;
        let submission: ClaimSubmission = serde_json::from_str(json).unwrap();
        let err = submission.into_claim(default_max_claim_amount()).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }
}
