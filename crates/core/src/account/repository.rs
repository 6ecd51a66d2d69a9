//! Persistence contract for accounts.

use async_trait::async_trait;
use finbook_shared::{
    AppResult,
    types::{AccountId, UserId},
};
use rust_decimal::Decimal;

use super::types::{Account, AccountPatch};

/// Storage operations the account and posting services rely on.
///
/// `adjust_balance` and `adjust_locked` are single-document atomic
/// increments. They are the only way balances move; concurrent deltas
/// compose without lost updates even though no cross-document
/// transaction exists.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persists a freshly-built account.
    async fn insert(&self, account: &Account) -> AppResult<()>;

    /// Looks up an account by ID.
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>>;

    /// Lists a user's accounts.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Account>>;

    /// Applies a partial update, returning the refreshed account.
    async fn update(&self, id: AccountId, patch: AccountPatch) -> AppResult<Option<Account>>;

    /// Deletes an account, returning whether a document was removed.
    async fn delete(&self, id: AccountId) -> AppResult<bool>;

    /// Atomically increments the balance by `delta` (may be negative),
    /// returning the refreshed account, or `None` if it does not exist.
    async fn adjust_balance(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>>;

    /// Atomically increments `goal_locked_amount` by `delta` (may be
    /// negative), returning the refreshed account.
    async fn adjust_locked(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>>;
}
