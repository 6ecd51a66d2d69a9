//! Account management rules.

use std::sync::Arc;

use finbook_shared::{
    AppError, AppResult,
    types::{AccountId, UserId},
};

use crate::user::UserRepository;

use super::repository::AccountRepository;
use super::types::{Account, AccountPatch, NewAccount};

/// Account service: ownership-checked CRUD.
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Creates the service over account and user repositories.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { accounts, users }
    }

    /// Opens an account for an existing user.
    pub async fn create(&self, input: NewAccount) -> AppResult<Account> {
        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "user {} not found",
                input.user_id
            )));
        }

        let account = Account::new(input);
        self.accounts.insert(&account).await?;
        Ok(account)
    }

    /// Fetches an account by ID.
    pub async fn get(&self, id: AccountId) -> AppResult<Account> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))
    }

    /// Lists a user's accounts.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Account>> {
        self.accounts.list_for_user(user_id).await
    }

    /// Applies a partial update to an account.
    pub async fn update(&self, id: AccountId, patch: AccountPatch) -> AppResult<Account> {
        self.accounts
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {id} not found")))
    }

    /// Deletes an account.
    ///
    /// Referential integrity is write-time only: goals or transactions
    /// still pointing at the account surface as not-found at use time.
    pub async fn delete(&self, id: AccountId) -> AppResult<()> {
        if self.accounts.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("account {id} not found")))
        }
    }
}
