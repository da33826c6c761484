//! Up-front processing cost estimate used by the budget gate

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Money;
use domain_claims::HealthcareClaim;

const BASE_PROCESSING: Decimal = dec!(0.05);
const REASONING_BASE: Decimal = dec!(0.03);
const REASONING_PER_1K_CONTEXT_CHARS: Decimal = dec!(0.01);
const COMPLIANCE_BASE: Decimal = dec!(0.10);

/// Estimates the full pipeline cost for a claim, rounded to 3 dp
///
/// `(base + reasoning + compliance) * priority multiplier`, where the
/// reasoning share grows with the medical necessity context.
pub fn estimate_processing_cost(claim: &HealthcareClaim) -> Money {
    let context_chars = Decimal::from(claim.context_len() as u64);
    let reasoning = REASONING_BASE + context_chars / dec!(1000) * REASONING_PER_1K_CONTEXT_CHARS;
    let total = Money::new(BASE_PROCESSING + reasoning + COMPLIANCE_BASE);
    (total * claim.priority.cost_multiplier()).round_dp(3)
}
