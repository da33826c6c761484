//! Strongly-typed identifiers for domain entities
//!
//! Claims and validation results are keyed by human-readable identifiers of
//! the form `<PREFIX>_<YYYYMMDD>_<NNN>`. Newtype wrappers parse and validate
//! that shape once, so the rest of the system can never mix a claim id with
//! a result id or carry a malformed one.

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an identifier does not match its expected format
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {kind} identifier '{value}': expected format {expected}")]
pub struct IdentifierError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

macro_rules! define_dated_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a service date and a sequence number (0-999)
            pub fn new(date: NaiveDate, sequence: u16) -> Self {
                Self(format!(
                    "{}_{}_{:03}",
                    $prefix,
                    date.format("%Y%m%d"),
                    sequence % 1000
                ))
            }

            /// Generates an identifier for today with a random sequence number
            pub fn generate() -> Self {
                let sequence = rand::thread_rng().gen_range(0..1000);
                Self::new(Utc::now().date_naive(), sequence)
            }

            /// Returns the identifier prefix
            pub fn prefix() -> &'static str {
                $prefix
            }

            /// Returns true if the string matches `<PREFIX>_<8 digits>_<3 digits>`
            pub fn is_valid(value: &str) -> bool {
                let Some(rest) = value.strip_prefix(concat!($prefix, "_")) else {
                    return false;
                };
                match rest.split_once('_') {
                    Some((date, seq)) => is_digits(date, 8) && is_digits(seq, 3),
                    None => false,
                }
            }

            /// Returns the `YYYYMMDD` date component
            pub fn date_part(&self) -> &str {
                let start = $prefix.len() + 1;
                &self.0[start..start + 8]
            }

            /// Returns the three-digit sequence component
            pub fn sequence(&self) -> &str {
                &self.0[self.0.len() - 3..]
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if Self::is_valid(s) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(IdentifierError {
                        kind: $prefix,
                        value: s.to_string(),
                        expected: concat!($prefix, "_YYYYMMDD_NNN"),
                    })
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentifierError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_dated_id!(ClaimId, "CLAIM");
define_dated_id!(ResultId, "RESULT");

impl ResultId {
    /// Derives the result identifier for a claim: today's date plus the claim's sequence
    pub fn for_claim(claim_id: &ClaimId) -> Self {
        Self(format!(
            "RESULT_{}_{}",
            Utc::now().date_naive().format("%Y%m%d"),
            claim_id.sequence()
        ))
    }
}

/// Identifier of a demonstration session used for cost bookkeeping
///
/// Accepts 1-64 characters of ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Derives the session a claim belongs to from its date component
    pub fn for_claim(claim_id: &ClaimId) -> Self {
        Self(format!("DEMO_SESSION_{}", claim_id.date_part()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && s.len() <= 64
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(IdentifierError {
                kind: "SESSION",
                value: s.to_string(),
                expected: "1-64 characters of [A-Za-z0-9_-]",
            })
        }
    }
}

impl TryFrom<String> for SessionId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_display() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 26).unwrap();
        let id = ClaimId::new(date, 7);
        assert_eq!(id.to_string(), "CLAIM_20250826_007");
        assert_eq!(id.date_part(), "20250826");
        assert_eq!(id.sequence(), "007");
    }

    #[test]
    fn test_id_parsing() {
        let original = ClaimId::generate();
        let parsed: ClaimId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!("CLAIM_2025082_001".parse::<ClaimId>().is_err());
        assert!("CLAIM_20250826_01".parse::<ClaimId>().is_err());
        assert!("RESULT_20250826_001".parse::<ClaimId>().is_err());
        assert!("CLAIM_20250826_001_X".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_result_id_reuses_claim_sequence() {
        let claim_id: ClaimId = "CLAIM_20250101_042".parse().unwrap();
        let result_id = ResultId::for_claim(&claim_id);
        assert!(ResultId::is_valid(result_id.as_str()));
        assert_eq!(result_id.sequence(), "042");
    }

    #[test]
    fn test_session_serde_rejects_invalid() {
        let session: SessionId = serde_json::from_str("\"DEMO_20250826_CFO\"").unwrap();
        assert_eq!(session.as_str(), "DEMO_20250826_CFO");
        assert!(serde_json::from_str::<SessionId>("\"bad session\"").is_err());
    }
}
