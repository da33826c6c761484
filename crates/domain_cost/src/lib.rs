//! Cost Domain
//!
//! Estimates what AI processing will cost before it runs, prices each
//! provider call after it runs, and keeps a per-session ledger against the
//! demo budget ceiling.

pub mod estimate;
pub mod pricing;
pub mod savings;
pub mod tracker;
pub mod error;

pub use estimate::estimate_processing_cost;
pub use pricing::{CostType, PricingTable};
pub use savings::{calculate_cost_savings, CostSavings};
pub use tracker::{
    BudgetConfig, BudgetHealth, BudgetStatus, CostBreakdown, CostOperation, CostTracker,
    SessionSummary,
};
pub use error::CostError;
