//! Tests for claim, result and session identifiers

use chrono::{NaiveDate, Utc};
use core_kernel::{ClaimId, ResultId, SessionId};
use proptest::prelude::*;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_generate_uses_today() {
        let id = ClaimId::generate();
        let today = Utc::now().date_naive().format("%Y%m%d").to_string();
        assert_eq!(id.date_part(), today);
        assert!(ClaimId::is_valid(id.as_str()));
    }

    #[test]
    fn test_new_pads_sequence() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 26).unwrap();
        assert_eq!(ClaimId::new(date, 1).as_str(), "CLAIM_20250826_001");
        assert_eq!(ClaimId::new(date, 999).as_str(), "CLAIM_20250826_999");
    }

    #[test]
    fn test_is_valid_rejects_wrong_shapes() {
        for bad in [
            "",
            "CLAIM_",
            "claim_20250826_001",
            "CLAIM_20250826_1234",
            "CLAIM_2025-08-26_001",
            "CLAIM_20250826001",
        ] {
            assert!(!ClaimId::is_valid(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_serde_validates() {
        let id: ClaimId = serde_json::from_str("\"CLAIM_20250826_001\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"CLAIM_20250826_001\"");
        assert!(serde_json::from_str::<ClaimId>("\"CLAIM_bad\"").is_err());
    }

    #[test]
    fn test_error_message_names_format() {
        let err = "nope".parse::<ClaimId>().unwrap_err();
        assert!(err.to_string().contains("CLAIM_YYYYMMDD_NNN"));
    }
}

mod result_id_tests {
    use super::*;

    #[test]
    fn test_result_id_for_claim() {
        let claim_id: ClaimId = "CLAIM_20240101_123".parse().unwrap();
        let result_id = ResultId::for_claim(&claim_id);
        let today = Utc::now().date_naive().format("%Y%m%d").to_string();
        assert_eq!(result_id.as_str(), format!("RESULT_{today}_123"));
    }
}

mod session_id_tests {
    use super::*;

    #[test]
    fn test_session_for_claim_uses_claim_date() {
        let claim_id: ClaimId = "CLAIM_20250826_001".parse().unwrap();
        assert_eq!(SessionId::for_claim(&claim_id).as_str(), "DEMO_SESSION_20250826");
    }

    #[test]
    fn test_session_parsing() {
        assert!("demo-session_1".parse::<SessionId>().is_ok());
        assert!("".parse::<SessionId>().is_err());
        assert!("has space".parse::<SessionId>().is_err());
        assert!("x".repeat(65).parse::<SessionId>().is_err());
    }
}

proptest! {
    #[test]
    fn prop_claim_ids_round_trip(day in 1u32..29, month in 1u32..13, seq in 0u16..1000) {
        let date = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
        let id = ClaimId::new(date, seq);
        prop_assert!(ClaimId::is_valid(id.as_str()));
        prop_assert_eq!(id.as_str().parse::<ClaimId>().unwrap(), id);
    }
}
