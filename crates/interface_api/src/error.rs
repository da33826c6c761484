//! API error handling
//!
//! Every failure is rendered through the error envelope:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": {
//!     "code": "HTTP_404",
//!     "message": "Claim CLAIM_20250826_001 not found",
//!     "timestamp": "...",
//!     "request_id": "..."
//!   },
//!   "timestamp": "...",
//!   "request_id": "..."
//! }
//! ```
//!
//! `details` is only included when the server runs with `debug` enabled.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_cost::CostError;
use infra_storage::StorageError;
use domain_validation::AiError;

use crate::config::ConfigError;
use crate::context::RequestContext;
use crate::dto::ErrorEnvelope;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },

    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Attaches debug details to a bad request or internal error
    pub fn with_details(self, details: impl Into<String>) -> Self {
        match self {
            ApiError::BadRequest { message, .. } => ApiError::BadRequest {
                message,
                details: Some(details.into()),
            },
            ApiError::Internal { message, .. } => ApiError::Internal {
                message,
                details: Some(details.into()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Envelope error code, e.g. `HTTP_400`
    pub fn code(&self) -> String {
        format!("HTTP_{}", self.status().as_u16())
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { details, .. } | ApiError::Internal { details, .. } => {
                details.as_deref()
            }
            _ => None,
        }
    }

    /// Binds the error to the request it failed
    pub fn in_context(self, ctx: &RequestContext) -> ApiFailure {
        ApiFailure {
            error: self,
            ctx: ctx.clone(),
        }
    }
}

/// An [`ApiError`] together with the request it belongs to
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub ctx: RequestContext,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!(
                request_id = %self.ctx.request_id,
                status = status.as_u16(),
                error = %self.error,
                details = self.error.details().unwrap_or_default(),
                "Request failed"
            );
        }
        let body = ErrorEnvelope::new(&self.error, &self.ctx);
        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        if err.is_client_error() {
            let details = match err.violations() {
                [] => err.to_string(),
                violations => violations.join("; "),
            };
            ApiError::bad_request("Invalid claim data").with_details(details)
        } else {
            ApiError::internal("Claim validation failed", err.to_string())
        }
    }
}

impl From<CostError> for ApiError {
    fn from(err: CostError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::internal("Storage operation failed", other.to_string()),
        }
    }
}

/// Errors raised while wiring the application together at startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Storage initialization failed: {0}")]
    Storage(#[from] StorageError),

    #[error("AI provider initialization failed: {0}")]
    Ai(#[from] AiError),

    #[error("Invalid budget: {0}")]
    Budget(#[from] CostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_status() {
        assert_eq!(ApiError::bad_request("x").code(), "HTTP_400");
        assert_eq!(ApiError::NotFound("x".into()).code(), "HTTP_404");
        assert_eq!(ApiError::MethodNotAllowed("PUT".into()).code(), "HTTP_405");
        assert_eq!(ApiError::internal("x", "y").code(), "HTTP_500");
    }

    #[test]
    fn test_claim_validation_maps_to_bad_request() {
        let err: ApiError =
            ClaimError::Validation(vec!["a".to_string(), "b".to_string()]).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid claim data");
        assert_eq!(err.details(), Some("a; b"));
    }

    #[test]
    fn test_port_not_found_maps_to_404() {
        let err: ApiError = PortError::not_found("Claim", "CLAIM_20250826_001").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = PortError::internal("disk full").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_method_not_allowed_message() {
        assert_eq!(
            ApiError::MethodNotAllowed("PATCH".into()).to_string(),
            "Method PATCH not allowed"
        );
    }
}
