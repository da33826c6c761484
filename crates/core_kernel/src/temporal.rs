//! Timestamp parsing and retention helpers
//!
//! Claim submissions arrive from several clients that disagree on date
//! formats, so timestamps are accepted as RFC 3339, as a naive
//! `YYYY-MM-DDTHH:MM:SS[.f]` (interpreted as UTC), or as a bare
//! `YYYY-MM-DD` date (midnight UTC).

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timestamp '{0}': expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp(String),

    #[error("Timestamp {0} is in the future")]
    FutureTimestamp(String),
}

/// Parses a timestamp in any of the accepted formats
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TemporalError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(TemporalError::InvalidTimestamp(value.to_string()))
}

/// Rejects timestamps later than `now`
pub fn ensure_not_future(value: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), TemporalError> {
    if value > now {
        return Err(TemporalError::FutureTimestamp(value.to_rfc3339()));
    }
    Ok(())
}

/// Returns the expiry instant, as epoch seconds, for a record retained `days` from `now`
pub fn expiry_epoch(now: DateTime<Utc>, days: u32) -> i64 {
    (now + Duration::days(i64::from(days))).timestamp()
}

/// Returns true if a record with the given expiry has lapsed at `now`
pub fn is_expired(expires_at_epoch: i64, now: DateTime<Utc>) -> bool {
    expires_at_epoch <= now.timestamp()
}
