//! Per-call pricing for the AI providers
//!
//! Costs are estimates, not invoices: reasoning calls are priced from the
//! response length at roughly four characters per token, compliance calls
//! per check returned. Failed calls still cost a small fixed amount so the
//! ledger does not under-report.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Category a ledger entry is booked under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    /// Language-model medical reasoning
    Reasoning,
    /// Compliance checking
    Compliance,
    ReasoningFailed,
    ComplianceFailed,
}

impl CostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostType::Reasoning => "reasoning",
            CostType::Compliance => "compliance",
            CostType::ReasoningFailed => "reasoning_failed",
            CostType::ComplianceFailed => "compliance_failed",
        }
    }

    /// The booking category for a failed call of this kind
    pub fn failed(&self) -> Self {
        match self {
            CostType::Reasoning | CostType::ReasoningFailed => CostType::ReasoningFailed,
            CostType::Compliance | CostType::ComplianceFailed => CostType::ComplianceFailed,
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price list for provider calls
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    pub reasoning_base: Money,
    pub reasoning_per_token: Decimal,
    pub chars_per_token: Decimal,
    pub compliance_per_check: Money,
    pub reasoning_failed: Money,
    pub compliance_failed: Money,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            reasoning_base: Money::new(dec!(0.03)),
            reasoning_per_token: dec!(0.00003),
            chars_per_token: dec!(4),
            compliance_per_check: Money::new(dec!(0.10)),
            reasoning_failed: Money::new(dec!(0.01)),
            compliance_failed: Money::new(dec!(0.05)),
        }
    }
}

impl PricingTable {
    /// Cost of a reasoning call that returned `response_text`
    pub fn reasoning_call_cost(&self, response_text: &str) -> Money {
        let chars = Decimal::from(response_text.chars().count() as u64);
        let tokens = chars / self.chars_per_token;
        self.reasoning_base + Money::new(tokens * self.reasoning_per_token)
    }

    /// Cost of a compliance call that returned `check_count` checks
    ///
    /// An empty response is billed as a single check.
    pub fn compliance_call_cost(&self, check_count: usize) -> Money {
        let checks = Decimal::from(check_count.max(1) as u64);
        self.compliance_per_check * checks
    }

    /// Fixed cost booked for a failed call
    pub fn failed_call_cost(&self, cost_type: CostType) -> Money {
        match cost_type.failed() {
            CostType::ReasoningFailed => self.reasoning_failed,
            _ => self.compliance_failed,
        }
    }
}
