//! HTTP API Layer
//!
//! This crate provides the REST API for AI claim validation using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claim submission and status, session costs, budget, health
//! - **Middleware**: request ids, tracing, audit logging, CORS
//! - **DTOs**: response shapes and the success/error envelopes
//! - **Error Handling**: [`error::ApiError`] rendered as `HTTP_<status>` envelopes
//!
//! Every route is served both at the root and under `/api/v1`.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState, config::ApiConfig};
//!
//! let state = AppState::from_config(ApiConfig::from_env()?).await?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{claims, health, method_not_allowed, route_not_found, sessions};
use crate::middleware::audit_middleware;

pub use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/claims",
            post(claims::submit_claim)
                .get(claims::missing_claim_id)
                .fallback(method_not_allowed),
        )
        .route(
            "/claims/:claim_id",
            get(claims::get_claim_status).fallback(method_not_allowed),
        )
        .route(
            "/sessions/:session_id/costs",
            get(sessions::get_session_costs)
                .delete(sessions::reset_session_costs)
                .fallback(method_not_allowed),
        )
        .route(
            "/sessions/:session_id/summary",
            get(sessions::get_session_summary).fallback(method_not_allowed),
        )
        .route(
            "/budget",
            get(sessions::get_budget_status).fallback(method_not_allowed),
        )
        .route(
            "/health",
            get(health::health_check).fallback(method_not_allowed),
        )
        .route(
            "/health/ready",
            get(health::readiness_check).fallback(method_not_allowed),
        )
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Adapters, cost tracker and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let routes = api_routes();
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(routes.clone())
        .nest("/api/v1", routes)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(audit_middleware)),
        )
        .layer(cors)
        .with_state(state)
}
