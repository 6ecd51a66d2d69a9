//! Persistence contract for savings goals.

use async_trait::async_trait;
use finbook_shared::{
    AppResult,
    types::{GoalId, UserId},
};
use rust_decimal::Decimal;

use super::types::{Goal, GoalPatch};

/// Storage operations the goal service relies on.
///
/// The increment methods are single-document atomic updates, mirroring
/// the account-side adjustments; `complete` folds the status flip and
/// reservation reset into one document write.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Persists a freshly-built goal.
    async fn insert(&self, goal: &Goal) -> AppResult<()>;

    /// Looks up a goal by ID.
    async fn find_by_id(&self, id: GoalId) -> AppResult<Option<Goal>>;

    /// Lists a user's goals.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Goal>>;

    /// Applies a partial update, returning the refreshed goal.
    async fn update(&self, id: GoalId, patch: GoalPatch) -> AppResult<Option<Goal>>;

    /// Deletes a goal, returning whether a document was removed.
    async fn delete(&self, id: GoalId) -> AppResult<bool>;

    /// Atomically increments `current_amount` by `delta`, returning the
    /// refreshed goal.
    async fn increment_progress(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>>;

    /// Atomically increments `reserved_amount` by `delta` (may be
    /// negative), returning the refreshed goal.
    async fn adjust_reserved(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>>;

    /// Atomically marks the goal completed and zeroes its reservation in
    /// a single document write, returning the refreshed goal.
    async fn complete(&self, id: GoalId) -> AppResult<Option<Goal>>;
}
