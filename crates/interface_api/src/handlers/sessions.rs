//! Session cost and budget handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use core_kernel::SessionId;

use crate::context::{ApiResult, RequestContext};
use crate::dto::SessionResetResponse;
use crate::error::{ApiError, ApiFailure};
use crate::AppState;

fn parse_session(ctx: &RequestContext, raw: &str) -> Result<SessionId, ApiFailure> {
    raw.parse().map_err(|e: core_kernel::IdentifierError| {
        ApiError::bad_request(format!("Invalid session ID: {raw}"))
            .with_details(e.to_string())
            .in_context(ctx)
    })
}

/// Ledger for one session
pub async fn get_session_costs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let session_id = parse_session(&ctx, &raw_id)?;
    let breakdown = state.cost_tracker.session_breakdown(&session_id).await;
    Ok(ctx.respond(StatusCode::OK, breakdown))
}

/// Executive summary for one session
pub async fn get_session_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let session_id = parse_session(&ctx, &raw_id)?;
    let summary = state.cost_tracker.session_summary(&session_id).await;
    Ok(ctx.respond(StatusCode::OK, summary))
}

/// Clears a session's ledger
pub async fn reset_session_costs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let session_id = parse_session(&ctx, &raw_id)?;
    let reset = state.cost_tracker.reset_session(&session_id).await;
    info!(session_id = %session_id, reset, request_id = %ctx.request_id, "Session costs reset");
    Ok(ctx.respond(StatusCode::OK, SessionResetResponse { session_id, reset }))
}

/// Spend across every session
pub async fn get_budget_status(State(state): State<AppState>, ctx: RequestContext) -> ApiResult {
    let status = state.cost_tracker.budget_status().await;
    Ok(ctx.respond(StatusCode::OK, status))
}
