//! In-memory budget repository.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use finbook_core::budget::{Budget, BudgetPatch, BudgetRepository, periods_conflict};
use finbook_shared::{
    AppResult,
    types::{BudgetId, UserId},
};

/// Budget repository over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryBudgetRepository {
    items: DashMap<BudgetId, Budget>,
}

impl MemoryBudgetRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepository for MemoryBudgetRepository {
    async fn insert(&self, budget: &Budget) -> AppResult<()> {
        self.items.insert(budget.id, budget.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BudgetId) -> AppResult<Option<Budget>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .items
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        budgets.sort_by_key(|budget| budget.period_start);
        Ok(budgets)
    }

    async fn find_for_day(
        &self,
        user_id: UserId,
        category: &str,
        day: NaiveDate,
    ) -> AppResult<Option<Budget>> {
        Ok(self
            .items
            .iter()
            .find(|entry| {
                entry.user_id == user_id && entry.category == category && entry.contains(day)
            })
            .map(|entry| entry.clone()))
    }

    async fn overlap_exists(
        &self,
        user_id: UserId,
        category: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<bool> {
        Ok(self.items.iter().any(|entry| {
            entry.user_id == user_id
                && entry.category == category
                && periods_conflict(
                    entry.period_start,
                    entry.period_end,
                    period_start,
                    period_end,
                )
        }))
    }

    async fn update(&self, id: BudgetId, patch: BudgetPatch) -> AppResult<Option<Budget>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(category) = patch.category {
            entry.category = category;
        }
        if let Some(period_start) = patch.period_start {
            entry.period_start = period_start;
        }
        if let Some(period_end) = patch.period_end {
            entry.period_end = period_end;
        }
        if let Some(limit_amount) = patch.limit_amount {
            entry.limit_amount = limit_amount;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: BudgetId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }

    async fn increment_spent(&self, id: BudgetId, delta: Decimal) -> AppResult<Option<Budget>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        entry.amount_spent += delta;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}
