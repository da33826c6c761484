//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use core_kernel::HealthCheckable;

use crate::context::{ApiResult, RequestContext};
use crate::dto::{HealthResponse, ReadinessResponse};
use crate::error::ApiError;
use crate::AppState;

/// Liveness
pub async fn health_check(ctx: RequestContext) -> ApiResult {
    Ok(ctx.respond(StatusCode::OK, HealthResponse::new("healthy")))
}

/// Readiness: storage and both AI providers must be operational
pub async fn readiness_check(State(state): State<AppState>, ctx: RequestContext) -> ApiResult {
    let checks = vec![
        state.claims.health_check().await,
        state.orchestrator.reasoning_provider().health_check().await,
        state.orchestrator.compliance_provider().health_check().await,
    ];

    let failures: Vec<String> = checks
        .iter()
        .filter(|c| !c.is_operational())
        .map(|c| format!("{}: {}", c.adapter_id, c.message.as_deref().unwrap_or("unhealthy")))
        .collect();

    if !failures.is_empty() {
        warn!(failures = %failures.join("; "), "Readiness check failed");
        return Err(ApiError::ServiceUnavailable("Service not ready".to_string()).in_context(&ctx));
    }

    Ok(ctx.respond(
        StatusCode::OK,
        ReadinessResponse {
            status: "ready".to_string(),
            checks,
        },
    ))
}
