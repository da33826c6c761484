//! Response envelopes shared by every endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T, request_id: &str) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
            request_id: request_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// `HTTP_<status>`
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl ErrorEnvelope {
    pub fn new(error: &ApiError, ctx: &RequestContext) -> Self {
        let timestamp = Utc::now();
        Self {
            success: false,
            error: ErrorBody {
                code: error.code(),
                message: error.to_string(),
                timestamp,
                request_id: ctx.request_id.clone(),
                details: ctx
                    .debug
                    .then(|| error.details().map(str::to_string))
                    .flatten(),
            },
            timestamp,
            request_id: ctx.request_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(debug: bool) -> RequestContext {
        RequestContext {
            request_id: "req-42".to_string(),
            debug,
            demo_session: None,
        }
    }

    #[test]
    fn test_details_hidden_unless_debug() {
        let error = ApiError::bad_request("Invalid claim data").with_details("claim_amount: too high");

        let quiet = serde_json::to_value(ErrorEnvelope::new(&error, &ctx(false))).unwrap();
        assert!(quiet["error"].get("details").is_none());
        assert_eq!(quiet["error"]["code"], "HTTP_400");
        assert_eq!(quiet["success"], false);

        let verbose = serde_json::to_value(ErrorEnvelope::new(&error, &ctx(true))).unwrap();
        assert_eq!(verbose["error"]["details"], "claim_amount: too high");
        assert_eq!(verbose["request_id"], "req-42");
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(SuccessEnvelope::new(7, "req-1")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 7);
        assert_eq!(body["request_id"], "req-1");
    }
}
