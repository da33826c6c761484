//! Claims handlers
//!
//! Submission runs the whole validation synchronously:
//! parse, budget gate, store as `processing`, mark `ai_review`, orchestrate,
//! store the result, then move the claim to the status the result implies.

use std::fmt::Display;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, warn};

use core_kernel::ClaimId;
use domain_claims::{ClaimStatus, ClaimSubmission};
use domain_cost::estimate_processing_cost;

use crate::context::{ApiResult, RequestContext};
use crate::dto::{ClaimStatusResponse, SubmissionResponse};
use crate::error::{ApiError, ApiFailure};
use crate::AppState;

fn submission_failed(ctx: &RequestContext, err: impl Display) -> ApiFailure {
    ApiError::internal("Claim submission failed", err.to_string()).in_context(ctx)
}

fn status_failed(ctx: &RequestContext, err: impl Display) -> ApiFailure {
    ApiError::internal("Failed to retrieve claim status", err.to_string()).in_context(ctx)
}

/// Submits a claim and validates it
pub async fn submit_claim(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Bytes,
) -> ApiResult {
    let submission: ClaimSubmission = serde_json::from_slice(&body).map_err(|e| {
        ApiError::bad_request("Invalid claim data")
            .with_details(e.to_string())
            .in_context(&ctx)
    })?;
    let mut claim = submission
        .into_claim(state.max_claim_amount)
        .map_err(|e| ctx.fail(e))?;

    info!(
        request_id = %ctx.request_id,
        claim_id = %claim.claim_id,
        procedure_code = %claim.procedure_code,
        priority = %claim.priority,
        "Claim submission received"
    );

    let session_id = ctx.session_for(&claim.claim_id)?;
    let estimated_cost = estimate_processing_cost(&claim);
    if let Err(e) = state.cost_tracker.check_budget(&session_id, estimated_cost).await {
        warn!(
            claim_id = %claim.claim_id,
            session_id = %session_id,
            estimated_cost = %estimated_cost,
            error = %e,
            "Claim rejected by budget gate"
        );
        return Err(ctx.fail(e));
    }

    claim.status = ClaimStatus::Processing;
    state
        .claims
        .store_claim(&claim)
        .await
        .map_err(|e| submission_failed(&ctx, e))?;
    state
        .claims
        .update_claim_status(&claim.claim_id, ClaimStatus::AiReview)
        .await
        .map_err(|e| submission_failed(&ctx, e))?;
    claim.status = ClaimStatus::AiReview;

    let metadata = ctx.operation_metadata(&session_id);
    let result = state
        .orchestrator
        .validate_claim(&claim, &session_id, &metadata)
        .await
        .map_err(|e| submission_failed(&ctx, e))?;

    state
        .claims
        .store_validation_result(&result)
        .await
        .map_err(|e| submission_failed(&ctx, e))?;
    state
        .claims
        .update_claim_status(&claim.claim_id, result.claim_status())
        .await
        .map_err(|e| submission_failed(&ctx, e))?;

    info!(
        request_id = %ctx.request_id,
        claim_id = %claim.claim_id,
        validation_status = %result.validation_status,
        confidence_score = result.confidence_score,
        requires_human_review = result.requires_human_review,
        "Claim validated"
    );

    let response = SubmissionResponse::new(claim.claim_id, session_id, estimated_cost, result);
    Ok(ctx.respond(StatusCode::CREATED, response))
}

/// `GET /claims` without an id
pub async fn missing_claim_id(ctx: RequestContext) -> ApiResult {
    Err(ApiError::bad_request("Missing claim ID in path").in_context(&ctx))
}

/// Returns a claim with its latest validation and progress
pub async fn get_claim_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let not_found = || ApiError::NotFound(format!("Claim {raw_id} not found")).in_context(&ctx);

    // A malformed id can never have been stored
    let Ok(claim_id) = raw_id.parse::<ClaimId>() else {
        return Err(not_found());
    };

    let claim = state
        .claims
        .get_claim(&claim_id)
        .await
        .map_err(|e| status_failed(&ctx, e))?
        .ok_or_else(not_found)?;
    let validation = state
        .claims
        .get_validation_result(&claim_id)
        .await
        .map_err(|e| status_failed(&ctx, e))?;

    Ok(ctx.respond(StatusCode::OK, ClaimStatusResponse::new(claim, validation)))
}
