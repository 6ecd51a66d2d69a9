//! In-memory goal repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use finbook_core::goal::{Goal, GoalPatch, GoalRepository, GoalStatus};
use finbook_shared::{
    AppResult,
    types::{GoalId, UserId},
};

/// Goal repository over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryGoalRepository {
    items: DashMap<GoalId, Goal>,
}

impl MemoryGoalRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalRepository for MemoryGoalRepository {
    async fn insert(&self, goal: &Goal) -> AppResult<()> {
        self.items.insert(goal.id, goal.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: GoalId) -> AppResult<Option<Goal>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .items
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        goals.sort_by_key(|goal| goal.created_at);
        Ok(goals)
    }

    async fn update(&self, id: GoalId, patch: GoalPatch) -> AppResult<Option<Goal>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(target) = patch.target_amount {
            entry.target_amount = target;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: GoalId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }

    async fn increment_progress(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        entry.current_amount += delta;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn adjust_reserved(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        entry.reserved_amount += delta;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn complete(&self, id: GoalId) -> AppResult<Option<Goal>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        // One entry lock covers the status flip and reservation reset.
        entry.status = GoalStatus::Completed;
        entry.reserved_amount = Decimal::ZERO;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}
