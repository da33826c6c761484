//! Per-session cost ledger
//!
//! The ledger lives for the lifetime of the process and is never persisted.
//! It is advisory: crossing the warning threshold or the budget ceiling is
//! logged, and callers decide whether to refuse further work via
//! [`CostTracker::check_budget`].
//!
//! Session ids come from clients, so the map is bounded. Opening a new
//! session first drops sessions idle for longer than
//! [`BudgetConfig::session_idle_ttl`], then evicts the least recently active
//! session while [`BudgetConfig::max_sessions`] is reached.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use core_kernel::{Money, SessionId};
use crate::error::CostError;
use crate::pricing::CostType;
use crate::savings::to_percent;

/// Budget limits applied to every session
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetConfig {
    pub max_budget: Money,
    pub warning_threshold: Money,
    pub enabled: bool,
    /// Manual review cost per claim, used for session-level savings
    pub manual_review_cost: Money,
    pub session_idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_budget: Money::new(dec!(50.00)),
            warning_threshold: Money::new(dec!(45.00)),
            enabled: true,
            manual_review_cost: Money::new(dec!(20.00)),
            session_idle_ttl: Duration::hours(24),
            max_sessions: 1000,
        }
    }
}

impl BudgetConfig {
    /// Budget must be positive and at most $100; the warning sits below the budget
    pub fn validate(&self) -> Result<(), CostError> {
        if !self.max_budget.is_positive() || self.max_budget.amount() > dec!(100) {
            return Err(CostError::InvalidBudget(format!(
                "max budget must be in (0, 100], got {}",
                self.max_budget
            )));
        }
        if self.warning_threshold >= self.max_budget {
            return Err(CostError::InvalidBudget(format!(
                "warning threshold {} must be below max budget {}",
                self.warning_threshold, self.max_budget
            )));
        }
        if self.max_sessions == 0 || self.session_idle_ttl <= Duration::zero() {
            return Err(CostError::InvalidBudget(
                "session limits must allow at least one live session".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single booked cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOperation {
    pub operation: String,
    pub cost_type: CostType,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SessionLedger {
    total_cost: Money,
    costs_by_type: BTreeMap<CostType, Money>,
    operations: Vec<CostOperation>,
    claims_processed: u64,
    total_processing_time_ms: u64,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl SessionLedger {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            total_cost: Money::zero(),
            costs_by_type: BTreeMap::new(),
            operations: Vec::new(),
            claims_processed: 0,
            total_processing_time_ms: 0,
            created_at: now,
            last_activity: now,
        }
    }
}

/// Detailed cost view for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub session_id: SessionId,
    pub total_cost: Money,
    pub costs_by_type: BTreeMap<CostType, Money>,
    pub operations: Vec<CostOperation>,
    pub claims_processed: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub budget_remaining: Money,
    pub budget_utilization_percentage: f64,
}

/// Where a session stands against its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    WithinBudget,
    Warning,
    Exceeded,
}

/// Executive dashboard view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub duration_minutes: f64,
    pub claims_processed: u64,
    pub total_cost: String,
    pub cost_per_claim: String,
    pub budget_remaining: String,
    pub average_processing_time_ms: f64,
    /// AI spend versus manual review of the same number of claims
    pub cost_reduction: String,
    pub budget_health: BudgetHealth,
}

/// Budget position across every session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub total_costs_across_sessions: Money,
    pub max_demo_budget: Money,
    pub remaining_budget: Money,
    pub active_sessions: usize,
    pub budget_utilization_percentage: f64,
}

/// In-process cost ledger keyed by demo session
#[derive(Debug, Default)]
pub struct CostTracker {
    config: BudgetConfig,
    sessions: RwLock<HashMap<SessionId, SessionLedger>>,
}

impl CostTracker {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Books a cost against a session, logging threshold crossings
    pub async fn record_cost(
        &self,
        session_id: &SessionId,
        cost_type: CostType,
        amount: Money,
        operation: &str,
    ) {
        if !self.config.enabled {
            return;
        }

        let total = {
            let mut sessions = self.sessions.write().await;
            let ledger = self.open_ledger(&mut sessions, session_id);

            ledger.total_cost += amount;
            *ledger.costs_by_type.entry(cost_type).or_insert_with(Money::zero) += amount;
            ledger.operations.push(CostOperation {
                operation: operation.to_string(),
                cost_type,
                amount,
                timestamp: Utc::now(),
            });
            ledger.total_cost
        };

        info!(
            session_id = %session_id,
            cost_type = %cost_type,
            operation = operation,
            cost_usd = %amount.amount(),
            session_total_usd = %total.amount(),
            "api_cost_tracked"
        );

        if total >= self.config.max_budget {
            error!(
                session_id = %session_id,
                current_cost = %total.amount(),
                limit = %self.config.max_budget.amount(),
                "budget_limit_exceeded"
            );
        } else if total >= self.config.warning_threshold {
            warn!(
                session_id = %session_id,
                current_cost = %total.amount(),
                threshold = %self.config.warning_threshold.amount(),
                "budget_warning_threshold_reached"
            );
        }
    }

    /// Counts a processed claim and its end-to-end processing time
    pub async fn record_claim_processed(&self, session_id: &SessionId, processing_time_ms: u64) {
        if !self.config.enabled {
            return;
        }
        let mut sessions = self.sessions.write().await;
        let ledger = self.open_ledger(&mut sessions, session_id);
        ledger.claims_processed += 1;
        ledger.total_processing_time_ms += processing_time_ms;
    }

    /// Total booked for a session; zero when unknown
    pub async fn session_cost(&self, session_id: &SessionId) -> Money {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|l| l.total_cost)
            .unwrap_or_else(Money::zero)
    }

    pub async fn session_breakdown(&self, session_id: &SessionId) -> CostBreakdown {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(ledger) => CostBreakdown {
                session_id: session_id.clone(),
                total_cost: ledger.total_cost,
                costs_by_type: ledger.costs_by_type.clone(),
                operations: ledger.operations.clone(),
                claims_processed: ledger.claims_processed,
                created_at: Some(ledger.created_at),
                budget_remaining: self.config.max_budget - ledger.total_cost,
                budget_utilization_percentage: self.utilization(ledger.total_cost),
            },
            None => CostBreakdown {
                session_id: session_id.clone(),
                total_cost: Money::zero(),
                costs_by_type: BTreeMap::new(),
                operations: Vec::new(),
                claims_processed: 0,
                created_at: None,
                budget_remaining: self.config.max_budget,
                budget_utilization_percentage: 0.0,
            },
        }
    }

    pub async fn session_summary(&self, session_id: &SessionId) -> SessionSummary {
        let sessions = self.sessions.read().await;
        let ledger = sessions.get(session_id);

        let total = ledger.map(|l| l.total_cost).unwrap_or_else(Money::zero);
        let claims = ledger.map(|l| l.claims_processed).unwrap_or(0);
        let duration_minutes = ledger
            .map(|l| (Utc::now() - l.created_at).num_milliseconds() as f64 / 60_000.0)
            .unwrap_or(0.0);
        let average_processing_time_ms = match ledger {
            Some(l) if l.claims_processed > 0 => {
                l.total_processing_time_ms as f64 / l.claims_processed as f64
            }
            _ => 0.0,
        };

        let cost_per_claim = if claims > 0 {
            total.amount() / Decimal::from(claims)
        } else {
            Decimal::ZERO
        };

        let manual_total = self.config.manual_review_cost * Decimal::from(claims);
        let cost_reduction = if manual_total.is_positive() {
            to_percent((manual_total - total).amount() / manual_total.amount() * dec!(100))
        } else {
            0.0
        };

        SessionSummary {
            session_id: session_id.clone(),
            duration_minutes: (duration_minutes * 10.0).round() / 10.0,
            claims_processed: claims,
            total_cost: total.to_string(),
            cost_per_claim: format!("${:.3}", cost_per_claim.round_dp(3)),
            budget_remaining: (self.config.max_budget - total).to_string(),
            average_processing_time_ms: (average_processing_time_ms * 10.0).round() / 10.0,
            cost_reduction: format!("{:.1}%", cost_reduction),
            budget_health: self.health(total),
        }
    }

    /// Drops a session's ledger; returns true if one existed
    pub async fn reset_session(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            info!(session_id = %session_id, "Reset cost tracking for session");
        } else {
            debug!(session_id = %session_id, "No cost ledger to reset");
        }
        removed
    }

    pub async fn budget_status(&self) -> BudgetStatus {
        let sessions = self.sessions.read().await;
        let total: Money = sessions.values().map(|l| l.total_cost).sum();
        BudgetStatus {
            total_costs_across_sessions: total,
            max_demo_budget: self.config.max_budget,
            remaining_budget: self.config.max_budget - total,
            active_sessions: sessions.len(),
            budget_utilization_percentage: self.utilization(total),
        }
    }

    /// Refuses work whose estimate alone exceeds the budget, or whose session is already spent
    pub async fn check_budget(
        &self,
        session_id: &SessionId,
        estimated_cost: Money,
    ) -> Result<(), CostError> {
        if estimated_cost > self.config.max_budget {
            return Err(CostError::EstimateExceedsBudget {
                estimated: estimated_cost,
                budget: self.config.max_budget,
            });
        }

        if self.config.enabled {
            let current = self.session_cost(session_id).await;
            if current >= self.config.max_budget {
                return Err(CostError::BudgetExceeded {
                    session_id: session_id.clone(),
                    current,
                    limit: self.config.max_budget,
                });
            }
        }

        Ok(())
    }

    /// Number of sessions currently held in memory
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns the session's ledger, making room before opening a new one
    fn open_ledger<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, SessionLedger>,
        session_id: &SessionId,
    ) -> &'a mut SessionLedger {
        let now = Utc::now();
        if !sessions.contains_key(session_id) {
            self.evict_sessions(sessions, now);
        }
        let ledger = sessions
            .entry(session_id.clone())
            .or_insert_with(SessionLedger::new);
        ledger.last_activity = now;
        ledger
    }

    fn evict_sessions(&self, sessions: &mut HashMap<SessionId, SessionLedger>, now: DateTime<Utc>) {
        let cutoff = now - self.config.session_idle_ttl;
        let before = sessions.len();
        sessions.retain(|_, ledger| ledger.last_activity > cutoff);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(expired, "Dropped idle cost sessions");
        }

        while sessions.len() >= self.config.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, ledger)| ledger.last_activity)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!(
                session_id = %oldest,
                max_sessions = self.config.max_sessions,
                "Evicted least recently active cost session"
            );
        }
    }

    fn utilization(&self, total: Money) -> f64 {
        total
            .percentage_of(self.config.max_budget)
            .map(to_percent)
            .unwrap_or(0.0)
    }

    fn health(&self, total: Money) -> BudgetHealth {
        if total >= self.config.max_budget {
            BudgetHealth::Exceeded
        } else if total >= self.config.warning_threshold {
            BudgetHealth::Warning
        } else {
            BudgetHealth::WithinBudget
        }
    }
}
