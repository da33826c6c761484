//! Audit trail for compliance-relevant operations
//!
//! Every step that touches claim data emits three kinds of structured events,
//! tagged `compliance_event = true` so they can be routed to a retained sink:
//! `audit_trail_entry` when the step starts, then exactly one of
//! `audit_trail_completion` or `audit_trail_failure`. Failure events carry the
//! error message only; claim payloads are never logged.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use uuid::Uuid;

use crate::ports::OperationMetadata;

/// Handle for a single audited operation
#[derive(Debug)]
pub struct AuditTrail {
    audit_id: Uuid,
    operation: String,
    correlation_id: Option<String>,
    started: Instant,
}

impl AuditTrail {
    /// Opens an audit record and emits the entry event
    pub fn begin(operation: impl Into<String>, metadata: &OperationMetadata) -> Self {
        let trail = Self {
            audit_id: Uuid::new_v4(),
            operation: operation.into(),
            correlation_id: metadata.correlation_id.clone(),
            started: Instant::now(),
        };

        tracing::info!(
            event = "audit_trail_entry",
            compliance_event = true,
            audit_id = %trail.audit_id,
            operation = %trail.operation,
            correlation_id = ?trail.correlation_id,
            initiated_by = ?metadata.initiated_by,
            context = ?metadata.context,
            "Audited operation started"
        );

        trail
    }

    /// Emits the completion event
    pub fn complete(self) {
        tracing::info!(
            event = "audit_trail_completion",
            compliance_event = true,
            audit_id = %self.audit_id,
            operation = %self.operation,
            correlation_id = ?self.correlation_id,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "Audited operation completed"
        );
    }

    /// Emits the failure event
    pub fn fail(self, error: &dyn Display) {
        tracing::error!(
            event = "audit_trail_failure",
            compliance_event = true,
            audit_id = %self.audit_id,
            operation = %self.operation,
            correlation_id = ?self.correlation_id,
            duration_ms = self.started.elapsed().as_millis() as u64,
            error = %error,
            "Audited operation failed"
        );
    }
}

/// Runs `operation` inside an audit trail, emitting entry and outcome events
pub async fn audited<T, E, F>(
    operation: &str,
    metadata: &OperationMetadata,
    fut: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let trail = AuditTrail::begin(operation, metadata);
    match fut.await {
        Ok(value) => {
            trail.complete();
            Ok(value)
        }
        Err(err) => {
            trail.fail(&err);
            Err(err)
        }
    }
}
