//! AI provider errors
//!
//! None of these reach API clients: the orchestrator logs them, books the
//! failed-call cost and substitutes a fallback result.

use thiserror::Error;

/// Errors raised by reasoning and compliance providers
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Request(String),

    #[error("AI provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("AI provider returned no content")]
    EmptyResponse,

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("AI provider misconfigured: {0}")]
    Configuration(String),

    #[error("Failed to decode AI response: {0}")]
    Decode(String),
}

impl AiError {
    /// Whether retrying the same call could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Request(_) | AiError::Timeout(_) => true,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AiError::Decode(err.to_string())
        } else {
            AiError::Request(err.to_string())
        }
    }
}
