//! In-memory account repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use finbook_core::account::{Account, AccountPatch, AccountRepository};
use finbook_shared::{
    AppResult,
    types::{AccountId, UserId},
};

/// Account repository over a concurrent map.
///
/// The balance adjustments go through `get_mut`, which holds the entry
/// lock for the whole read-modify-write, so concurrent deltas compose.
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    items: DashMap<AccountId, Account>,
}

impl MemoryAccountRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, account: &Account) -> AppResult<()> {
        self.items.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .items
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        accounts.sort_by_key(|account| account.created_at);
        Ok(accounts)
    }

    async fn update(&self, id: AccountId, patch: AccountPatch) -> AppResult<Option<Account>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            entry.name = name;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }

    async fn adjust_balance(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        entry.balance += delta;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn adjust_locked(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        entry.goal_locked_amount += delta;
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}
