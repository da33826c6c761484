//! Savings and ROI figures for executive reporting

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Manual versus AI cost comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSavings {
    /// Rounded to cents
    pub cost_reduction_usd: Money,
    /// Rounded to one decimal place
    pub cost_reduction_percentage: f64,
    /// Savings relative to the AI spend, rounded to one decimal place
    pub roi_percentage: f64,
}

impl CostSavings {
    fn zero() -> Self {
        Self {
            cost_reduction_usd: Money::zero(),
            cost_reduction_percentage: 0.0,
            roi_percentage: 0.0,
        }
    }
}

/// Compares a manual review cost with the AI cost
pub fn calculate_cost_savings(manual_cost: Money, ai_cost: Money) -> CostSavings {
    if !manual_cost.is_positive() {
        return CostSavings::zero();
    }

    let reduction = manual_cost - ai_cost;
    let reduction_pct = reduction.amount() / manual_cost.amount() * dec!(100);
    let roi = if ai_cost.is_positive() {
        reduction.amount() / ai_cost.amount() * dec!(100)
    } else {
        Decimal::ZERO
    };

    CostSavings {
        cost_reduction_usd: reduction.round_to_cents(),
        cost_reduction_percentage: to_percent(reduction_pct),
        roi_percentage: to_percent(roi),
    }
}

/// Rounds a percentage to one decimal place for presentation
pub(crate) fn to_percent(value: Decimal) -> f64 {
    value.round_dp(1).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_against_manual_review() {
        let savings = calculate_cost_savings(Money::new(dec!(20)), Money::new(dec!(0.18)));
        assert_eq!(savings.cost_reduction_usd.amount(), dec!(19.82));
        assert_eq!(savings.cost_reduction_percentage, 99.1);
        assert_eq!(savings.roi_percentage, 11011.1);
    }

    #[test]
    fn test_zero_manual_cost() {
        let savings = calculate_cost_savings(Money::zero(), Money::new(dec!(1)));
        assert_eq!(savings, CostSavings::zero());
    }

    #[test]
    fn test_free_ai_has_zero_roi() {
        let savings = calculate_cost_savings(Money::new(dec!(20)), Money::zero());
        assert_eq!(savings.cost_reduction_percentage, 100.0);
        assert_eq!(savings.roi_percentage, 0.0);
    }
}
