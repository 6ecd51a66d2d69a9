//! MongoDB document shapes and their domain conversions.
//!
//! Monetary amounts are stored as integer minor units (cents) so that
//! `$inc` stays exact; `rust_decimal` values would serialize as strings
//! and lose atomic increments. Calendar dates are stored as ISO
//! `YYYY-MM-DD` strings, which compare lexicographically in date order;
//! timestamps are native BSON datetimes.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, NaiveDate, Utc};
use finbook_core::account::Account;
use finbook_core::budget::Budget;
use finbook_core::goal::{Goal, GoalStatus};
use finbook_core::transaction::{Transaction, TransactionKind};
use finbook_core::user::User;
use finbook_shared::types::{AccountId, BudgetId, GoalId, TransactionId, UserId};
use finbook_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Collection name for users.
pub const USERS: &str = "users";
/// Collection name for accounts.
pub const ACCOUNTS: &str = "accounts";
/// Collection name for budgets.
pub const BUDGETS: &str = "budgets";
/// Collection name for goals.
pub const GOALS: &str = "goals";
/// Collection name for transactions.
pub const TRANSACTIONS: &str = "transactions";

/// Converts a decimal amount to integer minor units (cents).
///
/// Amounts carry at most two decimal places by the time they reach
/// storage; anything finer is rejected rather than silently rounded.
pub fn to_minor(amount: Decimal) -> AppResult<i64> {
    let scaled = amount * Decimal::ONE_HUNDRED;
    if scaled != scaled.trunc() {
        return Err(AppError::Validation(format!(
            "amount {amount} has more than two decimal places"
        )));
    }
    scaled
        .to_i64()
        .ok_or_else(|| AppError::Internal(format!("amount {amount} out of storable range")))
}

/// Converts integer minor units (cents) back to a decimal amount.
#[must_use]
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// MongoDB document for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.into_inner(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: UserId::from_object_id(doc.id),
            email: doc.email,
            name: doc.name,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// MongoDB document for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDocument {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user.
    pub user_id: ObjectId,
    /// Account name.
    pub name: String,
    /// Book balance in minor units.
    pub balance_minor: i64,
    /// Goal-locked funds in minor units.
    pub goal_locked_minor: i64,
    /// Creation timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Account> for AccountDocument {
    type Error = AppError;

    fn try_from(account: &Account) -> AppResult<Self> {
        Ok(Self {
            id: account.id.into_inner(),
            user_id: account.user_id.into_inner(),
            name: account.name.clone(),
            balance_minor: to_minor(account.balance)?,
            goal_locked_minor: to_minor(account.goal_locked_amount)?,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }
}

impl From<AccountDocument> for Account {
    fn from(doc: AccountDocument) -> Self {
        Self {
            id: AccountId::from_object_id(doc.id),
            user_id: UserId::from_object_id(doc.user_id),
            name: doc.name,
            balance: from_minor(doc.balance_minor),
            goal_locked_amount: from_minor(doc.goal_locked_minor),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// MongoDB document for a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDocument {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user.
    pub user_id: ObjectId,
    /// Spending category.
    pub category: String,
    /// First day of the period (ISO string in storage).
    pub period_start: NaiveDate,
    /// Last day of the period (ISO string in storage).
    pub period_end: NaiveDate,
    /// Spending limit in minor units.
    pub limit_minor: i64,
    /// Accumulated spend in minor units.
    pub spent_minor: i64,
    /// Creation timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Budget> for BudgetDocument {
    type Error = AppError;

    fn try_from(budget: &Budget) -> AppResult<Self> {
        Ok(Self {
            id: budget.id.into_inner(),
            user_id: budget.user_id.into_inner(),
            category: budget.category.clone(),
            period_start: budget.period_start,
            period_end: budget.period_end,
            limit_minor: to_minor(budget.limit_amount)?,
            spent_minor: to_minor(budget.amount_spent)?,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        })
    }
}

impl From<BudgetDocument> for Budget {
    fn from(doc: BudgetDocument) -> Self {
        Self {
            id: BudgetId::from_object_id(doc.id),
            user_id: UserId::from_object_id(doc.user_id),
            category: doc.category,
            period_start: doc.period_start,
            period_end: doc.period_end,
            limit_amount: from_minor(doc.limit_minor),
            amount_spent: from_minor(doc.spent_minor),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// MongoDB document for a savings goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDocument {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user.
    pub user_id: ObjectId,
    /// Funding account.
    pub account_id: ObjectId,
    /// Goal name.
    pub name: String,
    /// Target amount in minor units.
    pub target_minor: i64,
    /// Accumulated contributions in minor units.
    pub current_minor: i64,
    /// Lifecycle status.
    pub status: GoalStatus,
    /// Whether contributions reserve funds on the account.
    pub lock_funds: bool,
    /// Reserved funds in minor units.
    pub reserved_minor: i64,
    /// Creation timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Goal> for GoalDocument {
    type Error = AppError;

    fn try_from(goal: &Goal) -> AppResult<Self> {
        Ok(Self {
            id: goal.id.into_inner(),
            user_id: goal.user_id.into_inner(),
            account_id: goal.account_id.into_inner(),
            name: goal.name.clone(),
            target_minor: to_minor(goal.target_amount)?,
            current_minor: to_minor(goal.current_amount)?,
            status: goal.status,
            lock_funds: goal.lock_funds,
            reserved_minor: to_minor(goal.reserved_amount)?,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        })
    }
}

impl From<GoalDocument> for Goal {
    fn from(doc: GoalDocument) -> Self {
        Self {
            id: GoalId::from_object_id(doc.id),
            user_id: UserId::from_object_id(doc.user_id),
            account_id: AccountId::from_object_id(doc.account_id),
            name: doc.name,
            target_amount: from_minor(doc.target_minor),
            current_amount: from_minor(doc.current_minor),
            status: doc.status,
            lock_funds: doc.lock_funds,
            reserved_amount: from_minor(doc.reserved_minor),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// MongoDB document for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDocument {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Posting user.
    pub user_id: ObjectId,
    /// Affected account.
    pub account_id: ObjectId,
    /// Amount in minor units.
    pub amount_minor: i64,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Spending category, if any.
    pub category: Option<String>,
    /// Goal the posting contributes to, if any.
    pub goal_id: Option<ObjectId>,
    /// Free-text description.
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Event timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    /// Creation timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&Transaction> for TransactionDocument {
    type Error = AppError;

    fn try_from(tx: &Transaction) -> AppResult<Self> {
        Ok(Self {
            id: tx.id.into_inner(),
            user_id: tx.user_id.into_inner(),
            account_id: tx.account_id.into_inner(),
            amount_minor: to_minor(tx.amount)?,
            kind: tx.kind,
            category: tx.category.clone(),
            goal_id: tx.goal_id.map(GoalId::into_inner),
            description: tx.description.clone(),
            tags: tx.tags.clone(),
            date: tx.date,
            created_at: tx.created_at,
        })
    }
}

impl From<TransactionDocument> for Transaction {
    fn from(doc: TransactionDocument) -> Self {
        Self {
            id: TransactionId::from_object_id(doc.id),
            user_id: UserId::from_object_id(doc.user_id),
            account_id: AccountId::from_object_id(doc.account_id),
            amount: from_minor(doc.amount_minor),
            kind: doc.kind,
            category: doc.category,
            goal_id: doc.goal_id.map(GoalId::from_object_id),
            description: doc.description,
            tags: doc.tags,
            date: doc.date,
            created_at: doc.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_minor_two_decimal_places() {
        assert_eq!(to_minor(dec!(123.45)).unwrap(), 12345);
        assert_eq!(to_minor(dec!(0)).unwrap(), 0);
        assert_eq!(to_minor(dec!(-50.25)).unwrap(), -5025);
    }

    #[test]
    fn test_to_minor_rejects_sub_cent_precision() {
        assert!(to_minor(dec!(1.005)).is_err());
        assert!(to_minor(dec!(0.001)).is_err());
    }

    #[test]
    fn test_from_minor_scale() {
        assert_eq!(from_minor(12345), dec!(123.45));
        assert_eq!(from_minor(-5025), dec!(-50.25));
        assert_eq!(from_minor(0), dec!(0.00));
    }

    proptest! {
        /// Storage conversion is lossless for any cent amount.
        #[test]
        fn test_minor_units_roundtrip(cents in -1_000_000_000_000i64..1_000_000_000_000) {
            let amount = from_minor(cents);
            prop_assert_eq!(to_minor(amount).unwrap(), cents);
        }
    }
}
