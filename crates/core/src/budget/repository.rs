//! Persistence contract for budgets.

use async_trait::async_trait;
use chrono::NaiveDate;
use finbook_shared::{
    AppResult,
    types::{BudgetId, UserId},
};
use rust_decimal::Decimal;

use super::types::{Budget, BudgetPatch};

/// Storage operations the budget service relies on.
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Persists a freshly-built budget.
    async fn insert(&self, budget: &Budget) -> AppResult<()>;

    /// Looks up a budget by ID.
    async fn find_by_id(&self, id: BudgetId) -> AppResult<Option<Budget>>;

    /// Lists a user's budgets.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Budget>>;

    /// The user's budget for `category` whose inclusive period contains
    /// `day`, if any.
    async fn find_for_day(
        &self,
        user_id: UserId,
        category: &str,
        day: NaiveDate,
    ) -> AppResult<Option<Budget>>;

    /// Whether any existing budget for (user, category) collides with the
    /// candidate period under [`super::types::periods_conflict`].
    async fn overlap_exists(
        &self,
        user_id: UserId,
        category: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<bool>;

    /// Applies a partial update, returning the refreshed budget.
    async fn update(&self, id: BudgetId, patch: BudgetPatch) -> AppResult<Option<Budget>>;

    /// Deletes a budget, returning whether a document was removed.
    async fn delete(&self, id: BudgetId) -> AppResult<bool>;

    /// Atomically increments `amount_spent` by `delta`, returning the
    /// refreshed budget, or `None` if it does not exist.
    async fn increment_spent(&self, id: BudgetId, delta: Decimal) -> AppResult<Option<Budget>>;
}
