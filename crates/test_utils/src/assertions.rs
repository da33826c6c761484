//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_claims::{ValidationResult, HUMAN_REVIEW_CONFIDENCE_THRESHOLD};
use rust_decimal::Decimal;
use serde_json::Value;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a confidence score lies in [0, 100]
pub fn assert_confidence_in_range(confidence: f64) {
    assert!(
        (0.0..=100.0).contains(&confidence),
        "Confidence {} outside [0, 100]",
        confidence
    );
}

/// Asserts the human review flag matches confidence and compliance outcomes
pub fn assert_review_flag_consistent(result: &ValidationResult) {
    let expected = result.confidence_score < HUMAN_REVIEW_CONFIDENCE_THRESHOLD
        || result.compliance_checks.iter().any(|c| !c.passed);
    assert_eq!(
        result.requires_human_review, expected,
        "requires_human_review={} but confidence={} and checks passed={}",
        result.requires_human_review,
        result.confidence_score,
        result.compliance_checks.iter().all(|c| c.passed)
    );
}

/// Asserts a JSON body is a success envelope and returns its `data`
pub fn assert_success_envelope(body: &Value) -> &Value {
    assert_eq!(body["success"], Value::Bool(true), "not a success envelope: {body}");
    assert!(body["request_id"].is_string(), "missing request_id: {body}");
    assert!(body["timestamp"].is_string(), "missing timestamp: {body}");
    &body["data"]
}

/// Asserts a JSON body is an error envelope with the given status code
pub fn assert_error_envelope(body: &Value, status: u16) {
    assert_eq!(body["success"], Value::Bool(false), "not an error envelope: {body}");
    assert_eq!(
        body["error"]["code"],
        Value::String(format!("HTTP_{status}")),
        "unexpected error code: {body}"
    );
    assert!(body["error"]["message"].is_string(), "missing message: {body}");
    assert!(body["error"]["request_id"].is_string(), "missing request_id: {body}");
}

/// Returns the error message from an error envelope
pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
