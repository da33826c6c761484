//! Session, budget and health DTOs

use serde::{Deserialize, Serialize};

use core_kernel::{HealthCheckResult, SessionId};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResetResponse {
    pub session_id: SessionId,
    /// False when the session had no recorded costs
    pub reset: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            service: "claims-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<HealthCheckResult>,
}
