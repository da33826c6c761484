//! Business metrics for executive reporting
//!
//! Every figure is a delta against fixed manual-review baselines, so the
//! numbers are illustrative rather than measured.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::claim::HealthcareClaim;

/// Cost, time and accuracy deltas versus manual review
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    /// USD saved by not routing the claim to a human reviewer, never negative
    pub manual_review_cost_avoided: Money,
    /// Turnaround reduction percentage (0-100)
    pub processing_time_reduction: f64,
    /// Confidence gained over manual consistency, in percentage points (0-100)
    pub accuracy_improvement: f64,
}

/// Manual-process baselines the metrics are measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineConstants {
    pub manual_review_cost: Money,
    pub manual_turnaround_hours: f64,
    pub ai_turnaround_minutes: f64,
    /// Share of manual decisions that agree with each other, in percent
    pub manual_consistency: f64,
    pub max_time_reduction: f64,
    pub max_accuracy_improvement: f64,
}

impl Default for BaselineConstants {
    fn default() -> Self {
        Self {
            manual_review_cost: Money::new(dec!(20.00)),
            manual_turnaround_hours: 96.0,
            ai_turnaround_minutes: 2.0,
            manual_consistency: 82.5,
            max_time_reduction: 99.9,
            max_accuracy_improvement: 25.0,
        }
    }
}

/// Computes [`BusinessMetrics`] for a validated claim
#[derive(Debug, Clone, Default)]
pub struct BusinessMetricsCalculator {
    baselines: BaselineConstants,
}

impl BusinessMetricsCalculator {
    pub fn new(baselines: BaselineConstants) -> Self {
        Self { baselines }
    }

    pub fn baselines(&self) -> &BaselineConstants {
        &self.baselines
    }

    /// Calculates the metrics for `claim` given the AI confidence score
    pub fn calculate(&self, claim: &HealthcareClaim, confidence_score: f64) -> BusinessMetrics {
        let b = &self.baselines;

        let cost_avoided = (b.manual_review_cost - claim.estimated_processing_cost()).non_negative();

        let ai_hours = b.ai_turnaround_minutes / 60.0;
        let time_reduction = if b.manual_turnaround_hours > 0.0 {
            (b.manual_turnaround_hours - ai_hours) / b.manual_turnaround_hours * 100.0
        } else {
            0.0
        };

        let accuracy = (confidence_score - b.manual_consistency).max(0.0);

        BusinessMetrics {
            manual_review_cost_avoided: cost_avoided,
            processing_time_reduction: time_reduction.clamp(0.0, b.max_time_reduction),
            accuracy_improvement: accuracy.min(b.max_accuracy_improvement),
        }
    }
}
