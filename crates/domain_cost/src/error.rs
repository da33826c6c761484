//! Cost domain errors

use thiserror::Error;

use core_kernel::{Money, MoneyError, SessionId};

/// Errors that can occur in budget and cost operations
#[derive(Debug, Error)]
pub enum CostError {
    #[error("Estimated processing cost {estimated} exceeds demo budget {budget}")]
    EstimateExceedsBudget { estimated: Money, budget: Money },

    #[error("Demo budget exceeded for session {session_id}: {current} of {limit} used")]
    BudgetExceeded {
        session_id: SessionId,
        current: Money,
        limit: Money,
    },

    #[error("Invalid budget configuration: {0}")]
    InvalidBudget(String),

    #[error(transparent)]
    Money(#[from] MoneyError),
}
