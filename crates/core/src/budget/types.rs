//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use finbook_shared::types::{BudgetId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spending status of a budget, derived from the spend ratio.
///
/// Never stored; always recomputed from `amount_spent / limit_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Below 80% of the limit.
    Healthy,
    /// At or above 80%, up to and including the limit.
    Warning,
    /// Past the limit.
    Exceeded,
}

/// A spending budget for one category over an inclusive date period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Spending category this budget caps.
    pub category: String,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Spending limit for the period.
    pub limit_amount: Decimal,
    /// Spending accumulated so far.
    pub amount_spent: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct NewBudget {
    /// Owning user.
    pub user_id: UserId,
    /// Spending category.
    pub category: String,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Spending limit.
    pub limit_amount: Decimal,
}

/// Partial update for a budget. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    /// New category.
    pub category: Option<String>,
    /// New period start.
    pub period_start: Option<NaiveDate>,
    /// New period end.
    pub period_end: Option<NaiveDate>,
    /// New spending limit.
    pub limit_amount: Option<Decimal>,
}

/// One row of a per-user budget overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Spending category.
    pub category: String,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Spending limit.
    pub limit_amount: Decimal,
    /// Spending accumulated so far.
    pub amount_spent: Decimal,
    /// Limit minus spend, floored at zero.
    pub remaining: Decimal,
    /// Derived spending status.
    pub status: BudgetStatus,
}

impl Budget {
    /// Builds a budget with a fresh ID, zero spend, and current timestamps.
    #[must_use]
    pub fn new(input: NewBudget) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id: input.user_id,
            category: input.category,
            period_start: input.period_start,
            period_end: input.period_end,
            limit_amount: input.limit_amount,
            amount_spent: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `day` falls inside the inclusive period.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.period_start <= day && day <= self.period_end
    }

    /// Derived spending status, see [`spend_status`].
    #[must_use]
    pub fn status(&self) -> BudgetStatus {
        spend_status(self.limit_amount, self.amount_spent)
    }

    /// Limit minus spend, floored at zero.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.limit_amount - self.amount_spent).max(Decimal::ZERO)
    }

    /// Summary row for this budget.
    #[must_use]
    pub fn summarize(&self) -> BudgetSummary {
        BudgetSummary {
            budget_id: self.id,
            category: self.category.clone(),
            period_start: self.period_start,
            period_end: self.period_end,
            limit_amount: self.limit_amount,
            amount_spent: self.amount_spent,
            remaining: self.remaining(),
            status: self.status(),
        }
    }
}

/// Whether a candidate period collides with an existing one.
///
/// A candidate `[new_start, new_end]` conflicts with an existing
/// `[start, end]` iff either of its endpoints falls inside the existing
/// period, inclusive on both ends. An existing period strictly enclosed
/// by the candidate is NOT flagged; creation order therefore matters.
#[must_use]
pub fn periods_conflict(
    start: NaiveDate,
    end: NaiveDate,
    new_start: NaiveDate,
    new_end: NaiveDate,
) -> bool {
    (start <= new_start && new_start <= end) || (start <= new_end && new_end <= end)
}

/// Derived spending status for a limit/spend pair.
///
/// Thresholds on the spend ratio: below 0.80 is `Healthy`, from 0.80 up
/// to and including 1.00 is `Warning`, past 1.00 is `Exceeded`.
#[must_use]
pub fn spend_status(limit: Decimal, spent: Decimal) -> BudgetStatus {
    // limit * 0.8 keeps the comparison exact; dividing would round.
    let warning_floor = limit * Decimal::new(8, 1);
    if spent > limit {
        BudgetStatus::Exceeded
    } else if spent >= warning_floor {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Healthy
    }
}
