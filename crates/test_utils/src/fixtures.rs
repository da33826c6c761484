//! Pre-built Test Fixtures
//!
//! Claims and submission payloads chosen so the mock scenario selector picks
//! a known scenario for each one.

use chrono::{DateTime, Duration, Utc};
use core_kernel::{ClaimId, Money, SessionId};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use crate::builders::HealthcareClaimBuilder;
use domain_claims::HealthcareClaim;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Routine office visit amount
    pub fn office_visit() -> Money {
        Money::new(dec!(150.00))
    }

    /// Amount that pushes a 99xxx visit into the complex scenario
    pub fn complex_visit() -> Money {
        Money::new(dec!(750.00))
    }

    /// Manual review cost per claim
    pub fn manual_review() -> Money {
        Money::new(dec!(20.00))
    }

    /// Default claim amount ceiling
    pub fn claim_cap() -> Money {
        Money::new(dec!(50000.00))
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A service date safely in the past
    pub fn service_date() -> DateTime<Utc> {
        Utc::now() - Duration::days(3)
    }

    /// RFC 3339 form of [`TemporalFixtures::service_date`]
    pub fn service_date_rfc3339() -> String {
        Self::service_date().to_rfc3339()
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn claim_id() -> ClaimId {
        ClaimId::generate()
    }

    pub fn session_id() -> SessionId {
        "TEST_SESSION".parse().expect("valid session id")
    }
}

/// Context long enough to pass the medical necessity check
pub const DETAILED_CONTEXT: &str =
    "Patient reports recurring reflux symptoms over six weeks despite first-line medication";

/// Fixture for claims, one per mock scenario
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// 99213 at $150 selects the standard scenario
    pub fn standard() -> HealthcareClaim {
        HealthcareClaimBuilder::new().build()
    }

    /// 99215 at $750 selects the complex scenario
    pub fn complex() -> HealthcareClaim {
        HealthcareClaimBuilder::new()
            .with_procedure_code("99215")
            .with_amount(MoneyFixtures::complex_visit())
            .build()
    }

    /// A procedure code starting with 0 selects the preventive scenario
    pub fn preventive() -> HealthcareClaim {
        HealthcareClaimBuilder::new()
            .with_procedure_code("00100")
            .with_diagnosis_code("Z00.0")
            .with_amount(Money::new(dec!(200.00)))
            .build()
    }
}

/// Fixture for JSON request bodies
pub struct SubmissionFixtures;

impl SubmissionFixtures {
    /// Standard scenario submission in snake_case
    pub fn standard() -> Value {
        json!({
            "patient_id": "DEMO_PATIENT_001",
            "provider_id": "PROV_001",
            "service_date": TemporalFixtures::service_date_rfc3339(),
            "procedure_code": "99213",
            "diagnosis_code": "K21.9",
            "claim_amount": 150.00,
            "priority": "routine",
            "medical_necessity_context": DETAILED_CONTEXT
        })
    }

    /// Complex scenario submission using camelCase keys
    pub fn complex_camel_case() -> Value {
        json!({
            "patientId": "DEMO_PATIENT_002",
            "providerId": "PROV_002",
            "serviceDate": TemporalFixtures::service_date_rfc3339(),
            "procedureCode": "99215",
            "diagnosisCode": "K21.9",
            "claimAmount": 750.00,
            "priority": "urgent"
        })
    }

    /// Submission whose amount is above the default cap
    pub fn over_cap() -> Value {
        let mut body = Self::standard();
        body["claim_amount"] = json!(75000.00);
        body
    }
}
