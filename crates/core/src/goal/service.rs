//! Goal rules: fund locking, contributions, and completion.

use std::sync::Arc;

use finbook_shared::{
    AppError, AppResult,
    types::{GoalId, UserId},
};
use rust_decimal::Decimal;

use crate::account::AccountRepository;

use super::repository::GoalRepository;
use super::types::{Goal, GoalPatch, GoalStatus, NewGoal};

/// Goal service: the fund-lock and completion engine.
pub struct GoalService {
    goals: Arc<dyn GoalRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl GoalService {
    /// Creates the service over goal and account repositories.
    #[must_use]
    pub fn new(goals: Arc<dyn GoalRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { goals, accounts }
    }

    /// Creates a goal against an existing account of the same user.
    pub async fn create(&self, input: NewGoal) -> AppResult<Goal> {
        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {} not found", input.account_id)))?;

        if account.user_id != input.user_id {
            return Err(AppError::BusinessRule(format!(
                "account {} does not belong to user {}",
                input.account_id, input.user_id
            )));
        }

        let goal = Goal::new(input);
        self.goals.insert(&goal).await?;
        Ok(goal)
    }

    /// Fetches a goal by ID.
    pub async fn get(&self, id: GoalId) -> AppResult<Goal> {
        self.goals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))
    }

    /// Lists a user's goals.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Goal>> {
        self.goals.list_for_user(user_id).await
    }

    /// Applies a partial update to a goal (name and target only).
    pub async fn update(&self, id: GoalId, patch: GoalPatch) -> AppResult<Goal> {
        self.goals
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))
    }

    /// Records a contribution toward a goal.
    ///
    /// For a fund-locking goal the contribution must fit into the
    /// account's spendable balance (balance minus existing locks); it is
    /// then reserved on both sides, account and goal. Non-locking goals
    /// skip the check entirely; overall sufficiency is the caller's
    /// concern. The contribution that reaches the target completes the
    /// goal and releases the whole reservation back to spendable funds.
    ///
    /// Each mutation is a single-document atomic increment; the sequence
    /// as a whole is best-effort (no cross-document transaction).
    pub async fn apply_contribution(&self, id: GoalId, amount: Decimal) -> AppResult<Goal> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "contribution amount must be positive".to_string(),
            ));
        }

        let goal = self
            .goals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))?;

        let account = self
            .accounts
            .find_by_id(goal.account_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "account {} not found for goal contribution",
                    goal.account_id
                ))
            })?;

        if goal.lock_funds {
            let available = account.available();
            if available < amount {
                return Err(AppError::BusinessRule(format!(
                    "insufficient free balance for locked goal: available {available}, contribution {amount}"
                )));
            }

            self.accounts
                .adjust_locked(goal.account_id, amount)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("account {} not found", goal.account_id))
                })?;
            self.goals
                .adjust_reserved(id, amount)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))?;
        }

        let updated = self
            .goals
            .increment_progress(id, amount)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))?;

        if updated.target_reached() {
            return self.finish(updated).await;
        }

        Ok(updated)
    }

    /// Completes a goal whose target has been reached: flips the status,
    /// zeroes the reservation, and hands the reserved funds back to the
    /// account's spendable balance.
    async fn finish(&self, goal: Goal) -> AppResult<Goal> {
        let reserved = goal.reserved_amount;

        let completed = self
            .goals
            .complete(goal.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {} not found", goal.id)))?;

        if goal.lock_funds && reserved > Decimal::ZERO {
            self.accounts
                .adjust_locked(goal.account_id, -reserved)
                .await?;
        }

        Ok(completed)
    }

    /// Deletes a goal, releasing any outstanding reservation first.
    ///
    /// The release is independent of the removal: a missing funding
    /// account is tolerated (nothing left to release).
    pub async fn delete(&self, id: GoalId) -> AppResult<()> {
        let goal = self
            .goals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("goal {id} not found")))?;

        if goal.status == GoalStatus::Active
            && goal.lock_funds
            && goal.reserved_amount > Decimal::ZERO
        {
            self.accounts
                .adjust_locked(goal.account_id, -goal.reserved_amount)
                .await?;
        }

        if self.goals.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("goal {id} not found")))
        }
    }
}
