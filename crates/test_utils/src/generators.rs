//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, Utc};
use core_kernel::{ClaimId, Money};
use domain_claims::{ClaimPriority, ClaimStatus, HealthcareClaim};
use proptest::prelude::*;

/// Strategy for claim amounts between $0.01 and $50,000.00
pub fn claim_amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..=5_000_000i64).prop_map(Money::from_cents)
}

/// Strategy for raw confidence values, including out-of-range ones
pub fn raw_confidence_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        -500.0f64..0.0,
        0.0f64..=100.0,
        100.0f64..500.0,
    ]
}

/// Strategy for five-digit procedure codes
pub fn procedure_code_strategy() -> impl Strategy<Value = String> {
    "[0-9]{5}"
}

/// Strategy for ICD-10 codes in `A00.0` form
pub fn diagnosis_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z][0-9]{2}\\.[0-9]"
}

pub fn priority_strategy() -> impl Strategy<Value = ClaimPriority> {
    prop_oneof![
        Just(ClaimPriority::Routine),
        Just(ClaimPriority::Urgent),
        Just(ClaimPriority::Emergency),
    ]
}

/// Strategy for optional context text of varying length
pub fn context_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z ]{0,200}")
}

/// Strategy for valid claims
pub fn claim_strategy() -> impl Strategy<Value = HealthcareClaim> {
    (
        procedure_code_strategy(),
        diagnosis_code_strategy(),
        claim_amount_strategy(),
        priority_strategy(),
        context_strategy(),
        1i64..365,
    )
        .prop_map(|(procedure, diagnosis, amount, priority, context, days_ago)| HealthcareClaim {
            claim_id: ClaimId::generate(),
            patient_id: "DEMO_PATIENT_001".to_string(),
            provider_id: "PROV_001".to_string(),
            service_date: Utc::now() - Duration::days(days_ago),
            procedure_code: procedure,
            diagnosis_code: diagnosis,
            claim_amount: amount,
            status: ClaimStatus::Submitted,
            submitted_at: Utc::now(),
            priority,
            medical_necessity_context: context,
            supporting_documents: None,
        })
}
