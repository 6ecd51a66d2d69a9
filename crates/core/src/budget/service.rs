//! Budget rules: period overlap on creation, limit enforcement on spend.

use std::sync::Arc;

use chrono::NaiveDate;
use finbook_shared::{
    AppError, AppResult,
    types::{BudgetId, UserId},
};
use rust_decimal::Decimal;

use super::repository::BudgetRepository;
use super::types::{Budget, BudgetPatch, BudgetSummary, NewBudget};

/// Budget service: overlap-checked creation and limit-checked spending.
pub struct BudgetService {
    budgets: Arc<dyn BudgetRepository>,
}

impl BudgetService {
    /// Creates the service over a budget repository.
    #[must_use]
    pub fn new(budgets: Arc<dyn BudgetRepository>) -> Self {
        Self { budgets }
    }

    /// Creates a budget.
    ///
    /// Rejects inverted periods and periods colliding with an existing
    /// budget for the same (user, category); both are rule violations,
    /// not validation errors, since the input itself is well-formed.
    pub async fn create(&self, input: NewBudget) -> AppResult<Budget> {
        if input.period_start > input.period_end {
            return Err(AppError::BusinessRule(format!(
                "budget period start {} is after period end {}",
                input.period_start, input.period_end
            )));
        }

        if self
            .budgets
            .overlap_exists(
                input.user_id,
                &input.category,
                input.period_start,
                input.period_end,
            )
            .await?
        {
            return Err(AppError::BusinessRule(format!(
                "budget period overlaps an existing '{}' budget",
                input.category
            )));
        }

        let budget = Budget::new(input);
        self.budgets.insert(&budget).await?;
        Ok(budget)
    }

    /// Fetches a budget by ID.
    pub async fn get(&self, id: BudgetId) -> AppResult<Budget> {
        self.budgets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("budget {id} not found")))
    }

    /// Lists a user's budgets.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Budget>> {
        self.budgets.list_for_user(user_id).await
    }

    /// The user's budget covering `day` for `category`, if any.
    pub async fn get_for(
        &self,
        user_id: UserId,
        category: &str,
        day: NaiveDate,
    ) -> AppResult<Option<Budget>> {
        self.budgets.find_for_day(user_id, category, day).await
    }

    /// Records spending against a budget.
    ///
    /// Fails when the spend would push `amount_spent` past the limit;
    /// landing exactly on the limit succeeds. On success the increment is
    /// a single atomic document update and the refreshed budget is
    /// returned.
    pub async fn apply_expense(&self, budget: &Budget, amount: Decimal) -> AppResult<Budget> {
        let spent_after = budget.amount_spent + amount;
        if spent_after > budget.limit_amount {
            let overage = spent_after - budget.limit_amount;
            return Err(AppError::BusinessRule(format!(
                "budget limit for category '{}' exceeded by {}",
                budget.category, overage
            )));
        }

        self.budgets
            .increment_spent(budget.id, amount)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("budget {} not found", budget.id)))
    }

    /// Applies a partial update to a budget.
    ///
    /// Period and limit changes are merged as-is: no overlap re-check, no
    /// spend re-check. An update can therefore produce colliding periods
    /// that creation would have rejected.
    pub async fn update(&self, id: BudgetId, patch: BudgetPatch) -> AppResult<Budget> {
        self.budgets
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("budget {id} not found")))
    }

    /// Deletes a budget.
    pub async fn delete(&self, id: BudgetId) -> AppResult<()> {
        if self.budgets.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("budget {id} not found")))
        }
    }

    /// Per-budget overview for a user: spend, remaining headroom, and
    /// derived status for every budget they own.
    pub async fn summarize(&self, user_id: UserId) -> AppResult<Vec<BudgetSummary>> {
        let budgets = self.budgets.list_for_user(user_id).await?;
        Ok(budgets.iter().map(Budget::summarize).collect())
    }
}
