//! Claims domain errors

use thiserror::Error;

use core_kernel::{IdentifierError, PortError, TemporalError};

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    #[error(transparent)]
    InvalidTimestamp(#[from] TemporalError),

    #[error("Claim {0} not found")]
    ClaimNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    /// Creates a validation error with a single message
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(vec![message.into()])
    }

    /// Returns the individual violation messages, if this is a validation error
    pub fn violations(&self) -> &[String] {
        match self {
            ClaimError::Validation(messages) => messages,
            _ => &[],
        }
    }

    /// Returns true if the error was caused by bad client input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClaimError::Validation(_)
                | ClaimError::InvalidIdentifier(_)
                | ClaimError::InvalidTimestamp(_)
        )
    }
}
