//! Per-request context extracted by every handler

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use core_kernel::{ClaimId, OperationMetadata, SessionId};

use crate::dto::SuccessEnvelope;
use crate::error::{ApiError, ApiFailure};
use crate::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const DEMO_SESSION_HEADER: &str = "x-demo-session";

/// Request id, debug flag and demo session header for the current request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub debug: bool,
    pub demo_session: Option<String>,
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap, debug: bool) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            request_id: header(REQUEST_ID_HEADER).unwrap_or_else(|| "unknown".to_string()),
            debug,
            demo_session: header(DEMO_SESSION_HEADER),
        }
    }

    /// Session for cost tracking: the header when present, else derived from the claim
    pub fn session_for(&self, claim_id: &ClaimId) -> Result<SessionId, ApiFailure> {
        match self.demo_session.as_deref() {
            Some(raw) => raw.parse().map_err(|e: core_kernel::IdentifierError| {
                ApiError::bad_request("Invalid demo session header")
                    .with_details(e.to_string())
                    .in_context(self)
            }),
            None => Ok(SessionId::for_claim(claim_id)),
        }
    }

    /// Audit metadata correlated with this request
    pub fn operation_metadata(&self, session_id: &SessionId) -> OperationMetadata {
        OperationMetadata::with_correlation_id(&self.request_id)
            .initiated_by("claims-api")
            .with_context("session_id", session_id.as_str())
    }

    /// Wraps `data` in the success envelope
    pub fn respond<T: Serialize>(&self, status: StatusCode, data: T) -> Response {
        (status, Json(SuccessEnvelope::new(data, &self.request_id))).into_response()
    }

    pub fn fail(&self, error: impl Into<ApiError>) -> ApiFailure {
        error.into().in_context(self)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, state.config.debug))
    }
}

/// Handler result
pub type ApiResult = Result<Response, ApiFailure>;
