//! Healthcare claim aggregate

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use core_kernel::temporal::ensure_not_future;
use core_kernel::{ClaimId, Money};
use crate::error::ClaimError;

static PATIENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DEMO_PATIENT_\d+$").expect("patient id pattern"));
static PROVIDER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PROV_\d+$").expect("provider id pattern"));
static PROCEDURE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}$").expect("procedure code pattern"));
static DIAGNOSIS_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\d{2}\.\d$").expect("diagnosis code pattern"));

/// Default upper bound on a single claim amount
pub fn default_max_claim_amount() -> Money {
    Money::new(dec!(50000))
}

/// Medical necessity context longer than this is billed as a complex case
const COMPLEX_CONTEXT_CHARS: usize = 500;

/// Claim processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Received, not yet stored
    Submitted,
    /// Stored and queued for validation
    Processing,
    /// AI reasoning and compliance checks in progress
    AiReview,
    Approved,
    Denied,
    /// Flagged for a human reviewer
    RequiresHumanReview,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Processing => "processing",
            ClaimStatus::AiReview => "ai_review",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Denied => "denied",
            ClaimStatus::RequiresHumanReview => "requires_human_review",
        }
    }

    /// Returns true once validation has produced a decision
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Approved | ClaimStatus::Denied | ClaimStatus::RequiresHumanReview
        )
    }

    /// Parses the stored snake_case representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted" => Some(ClaimStatus::Submitted),
            "processing" => Some(ClaimStatus::Processing),
            "ai_review" => Some(ClaimStatus::AiReview),
            "approved" => Some(ClaimStatus::Approved),
            "denied" => Some(ClaimStatus::Denied),
            "requires_human_review" => Some(ClaimStatus::RequiresHumanReview),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPriority {
    #[default]
    Routine,
    Urgent,
    Emergency,
}

impl ClaimPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimPriority::Routine => "routine",
            ClaimPriority::Urgent => "urgent",
            ClaimPriority::Emergency => "emergency",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "routine" => Some(ClaimPriority::Routine),
            "urgent" => Some(ClaimPriority::Urgent),
            "emergency" => Some(ClaimPriority::Emergency),
            _ => None,
        }
    }

    /// Cost multiplier applied to AI processing estimates
    pub fn cost_multiplier(&self) -> rust_decimal::Decimal {
        match self {
            ClaimPriority::Routine => dec!(1.0),
            ClaimPriority::Urgent => dec!(1.2),
            ClaimPriority::Emergency => dec!(1.5),
        }
    }
}

impl fmt::Display for ClaimPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A medical claim submitted for AI-assisted validation
///
/// Identifiers are de-identified demo references; no real patient data is
/// ever carried by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HealthcareClaim {
    pub claim_id: ClaimId,
    #[validate(regex(path = *PATIENT_ID_RE, message = "patient_id must match DEMO_PATIENT_<digits>"))]
    pub patient_id: String,
    #[validate(regex(path = *PROVIDER_ID_RE, message = "provider_id must match PROV_<digits>"))]
    pub provider_id: String,
    #[validate(custom(function = "not_in_future"))]
    pub service_date: DateTime<Utc>,
    /// CPT/HCPCS code
    #[validate(regex(path = *PROCEDURE_CODE_RE, message = "procedure_code must be 5 digits"))]
    pub procedure_code: String,
    /// ICD-10 code
    #[validate(regex(path = *DIAGNOSIS_CODE_RE, message = "diagnosis_code must match A00.0"))]
    pub diagnosis_code: String,
    #[validate(custom(function = "positive_amount"))]
    pub claim_amount: Money,
    pub status: ClaimStatus,
    #[validate(custom(function = "not_in_future"))]
    pub submitted_at: DateTime<Utc>,
    pub priority: ClaimPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_necessity_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_documents: Option<Vec<String>>,
}

impl HealthcareClaim {
    /// Runs every field rule plus the amount ceiling, reporting all violations at once
    pub fn validate_with_limit(&self, max_amount: Money) -> Result<(), ClaimError> {
        let mut violations = match Validate::validate(self) {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_errors(&errors),
        };

        if self.claim_amount > max_amount {
            violations.push(format!(
                "claim_amount: Claim amount {} exceeds maximum allowed {}",
                self.claim_amount, max_amount
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ClaimError::Validation(violations))
        }
    }

    /// Urgent and emergency claims are expedited
    pub fn is_high_priority(&self) -> bool {
        matches!(self.priority, ClaimPriority::Urgent | ClaimPriority::Emergency)
    }

    /// Length of the medical necessity context in characters
    pub fn context_len(&self) -> usize {
        self.medical_necessity_context
            .as_deref()
            .map(|c| c.chars().count())
            .unwrap_or(0)
    }

    /// Estimated AI processing cost used for budget tracking, rounded to 3 dp
    pub fn estimated_processing_cost(&self) -> Money {
        let mut base = dec!(0.05);
        if self.context_len() > COMPLEX_CONTEXT_CHARS {
            base += dec!(0.02);
        }
        (Money::new(base) * self.priority.cost_multiplier()).round_dp(3)
    }

    /// Sets a new status
    pub fn update_status(&mut self, status: ClaimStatus) {
        self.status = status;
    }
}

fn not_in_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    ensure_not_future(*value, Utc::now()).map_err(|_| {
        let mut err = ValidationError::new("future_date");
        err.message = Some(Cow::from("Date cannot be in the future"));
        err
    })
}

fn positive_amount(value: &Money) -> Result<(), ValidationError> {
    if !value.is_positive() {
        let mut err = ValidationError::new("non_positive_amount");
        err.message = Some(Cow::from("Claim amount must be greater than zero"));
        return Err(err);
    }
    Ok(())
}

/// Flattens validator output into sorted `field: message` strings
fn flatten_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Creates a claim identifier for today with a random sequence
pub fn generate_claim_id() -> ClaimId {
    ClaimId::generate()
}

/// Returns true if `value` is a well-formed claim identifier
pub fn is_valid_claim_id(value: &str) -> bool {
    ClaimId::is_valid(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claim() -> HealthcareClaim {
        HealthcareClaim {
            claim_id: "CLAIM_20250826_001".parse().unwrap(),
            patient_id: "DEMO_PATIENT_001".to_string(),
            provider_id: "PROV_001".to_string(),
            service_date: Utc::now() - Duration::days(2),
            procedure_code: "99213".to_string(),
            diagnosis_code: "K21.9".to_string(),
            claim_amount: Money::new(dec!(250)),
            status: ClaimStatus::Submitted,
            submitted_at: Utc::now() - Duration::minutes(1),
            priority: ClaimPriority::Routine,
            medical_necessity_context: None,
            supporting_documents: None,
        }
    }

    #[test]
    fn test_valid_claim_passes() {
        assert!(claim().validate_with_limit(default_max_claim_amount()).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported() {
        let mut c = claim();
        c.patient_id = "PATIENT_1".to_string();
        c.diagnosis_code = "k21.9".to_string();
        let err = c.validate_with_limit(default_max_claim_amount()).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_estimated_cost() {
        let mut c = claim();
        assert_eq!(c.estimated_processing_cost().amount(), dec!(0.05));
        c.priority = ClaimPriority::Emergency;
        c.medical_necessity_context = Some("x".repeat(501));
        assert_eq!(c.estimated_processing_cost().amount(), dec!(0.105));
    }

    #[test]
    fn test_status_serde_is_snake_case() {
        let json = serde_json::to_string(&ClaimStatus::RequiresHumanReview).unwrap();
        assert_eq!(json, "\"requires_human_review\"");
        assert_eq!(ClaimStatus::parse("ai_review"), Some(ClaimStatus::AiReview));
    }
}
