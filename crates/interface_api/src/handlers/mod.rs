//! Request handlers

pub mod claims;
pub mod health;
pub mod sessions;

use axum::http::{Method, Uri};

use crate::context::{ApiResult, RequestContext};
use crate::error::ApiError;

/// Fallback for methods a route does not support
pub async fn method_not_allowed(ctx: RequestContext, method: Method) -> ApiResult {
    Err(ApiError::MethodNotAllowed(method.to_string()).in_context(&ctx))
}

/// Fallback for unknown paths
pub async fn route_not_found(ctx: RequestContext, uri: Uri) -> ApiResult {
    Err(ApiError::NotFound(format!("Route {} not found", uri.path())).in_context(&ctx))
}
