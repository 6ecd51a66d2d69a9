//! Account data types.

use chrono::{DateTime, Utc};
use finbook_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money account owned by a user.
///
/// `balance` is the full book balance; `goal_locked_amount` is the portion
/// currently reserved by fund-locking savings goals. Spendable money is the
/// difference, see [`Account::available`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Account name.
    pub name: String,
    /// Current book balance.
    pub balance: Decimal,
    /// Funds reserved by locking goals.
    pub goal_locked_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for opening an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owning user.
    pub user_id: UserId,
    /// Account name.
    pub name: String,
    /// Opening balance.
    pub initial_balance: Decimal,
}

/// Partial update for an account. `None` fields are left unchanged.
///
/// Balances are deliberately absent: they move only through transaction
/// posting and goal lock/release, never by direct edit.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    /// New account name.
    pub name: Option<String>,
}

impl Account {
    /// Builds an account with a fresh ID, zero locked funds, and current
    /// timestamps.
    #[must_use]
    pub fn new(input: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            user_id: input.user_id,
            name: input.name,
            balance: input.initial_balance,
            goal_locked_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Spendable balance: book balance minus goal-locked funds.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.balance - self.goal_locked_amount
    }
}
