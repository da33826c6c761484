//! Confidence and decision extraction from free-text model output

use once_cell::sync::Lazy;
use regex::Regex;

use domain_claims::{clamp_confidence, ValidationStatus};

static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"confidence[:\s]+(\d+(?:\.\d+)?)").expect("valid confidence regex"));

const STRONG_INDICATORS: [&str; 4] = ["clearly", "definitely", "strongly indicated", "appropriate"];
const WEAK_INDICATORS: [&str; 4] = ["possibly", "might", "unclear", "insufficient"];

/// Extracts a confidence percentage from reasoning text
///
/// An explicit `confidence: NN` wins. Otherwise the score is derived from
/// how many hedging versus assertive phrases appear. The result is always
/// clamped to [0, 100].
pub fn extract_confidence(text: &str) -> f64 {
    let lower = text.to_lowercase();

    if let Some(value) = CONFIDENCE_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        return clamp_confidence(value);
    }

    let strong = STRONG_INDICATORS.iter().filter(|i| lower.contains(*i)).count() as f64;
    let weak = WEAK_INDICATORS.iter().filter(|i| lower.contains(*i)).count() as f64;

    let score = if strong > weak {
        75.0 + strong * 5.0
    } else {
        60.0 - weak * 5.0
    };
    clamp_confidence(score)
}

/// Maps reasoning text and confidence to a decision
pub fn determine_status(text: &str, confidence: f64) -> ValidationStatus {
    let lower = text.to_lowercase();

    if lower.contains("approved") && confidence >= 70.0 {
        ValidationStatus::Approved
    } else if lower.contains("denied") && confidence >= 70.0 {
        ValidationStatus::Denied
    } else if confidence < 60.0 {
        ValidationStatus::RequiresHumanReview
    } else if confidence >= 75.0 {
        ValidationStatus::Approved
    } else {
        ValidationStatus::RequiresHumanReview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_confidence() {
        assert_eq!(extract_confidence("Recommendation: APPROVED\nConfidence: 87%"), 87.0);
        assert_eq!(extract_confidence("CONFIDENCE 92.5"), 92.5);
        assert_eq!(extract_confidence("confidence: 140"), 100.0);
    }

    #[test]
    fn test_indicator_fallback() {
        assert_eq!(extract_confidence("The procedure is clearly appropriate"), 85.0);
        assert_eq!(extract_confidence("It might be needed, evidence unclear"), 50.0);
        assert_eq!(extract_confidence("No indicators at all"), 60.0);
    }

    #[test]
    fn test_status_rules() {
        assert_eq!(determine_status("APPROVED", 70.0), ValidationStatus::Approved);
        assert_eq!(determine_status("DENIED", 80.0), ValidationStatus::Denied);
        assert_eq!(determine_status("approved", 55.0), ValidationStatus::RequiresHumanReview);
        assert_eq!(determine_status("no decision", 80.0), ValidationStatus::Approved);
        assert_eq!(determine_status("no decision", 65.0), ValidationStatus::RequiresHumanReview);
    }
}
