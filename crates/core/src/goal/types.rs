//! Savings goal data types.

use chrono::{DateTime, Utc};
use finbook_shared::types::{AccountId, GoalId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Accepting contributions.
    Active,
    /// Target reached; any reservation has been released.
    Completed,
}

/// A savings goal funded from one account.
///
/// When `lock_funds` is set, every contribution reserves that amount on
/// the funding account (`goal_locked_amount`) and mirrors it here in
/// `reserved_amount`, shrinking the account's spendable balance without
/// moving the book balance. Completion releases the whole reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Goal ID.
    pub id: GoalId,
    /// Owning user.
    pub user_id: UserId,
    /// Funding account.
    pub account_id: AccountId,
    /// Goal name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Amount contributed so far.
    pub current_amount: Decimal,
    /// Lifecycle status.
    pub status: GoalStatus,
    /// Whether contributions reserve funds on the account. Immutable
    /// after creation.
    pub lock_funds: bool,
    /// Portion of the funding account currently reserved by this goal.
    pub reserved_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    /// Owning user.
    pub user_id: UserId,
    /// Funding account.
    pub account_id: AccountId,
    /// Goal name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Starting progress, usually zero.
    pub initial_amount: Decimal,
    /// Whether contributions reserve funds on the account.
    pub lock_funds: bool,
}

/// Partial update for a goal. `None` fields are left unchanged.
///
/// `lock_funds` is immutable after creation; `status` and
/// `reserved_amount` move only through the contribution and delete
/// engines.
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    /// New goal name.
    pub name: Option<String>,
    /// New target amount.
    pub target_amount: Option<Decimal>,
}

impl Goal {
    /// Builds a goal with a fresh ID, no reservation, and current
    /// timestamps.
    #[must_use]
    pub fn new(input: NewGoal) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            user_id: input.user_id,
            account_id: input.account_id,
            name: input.name,
            target_amount: input.target_amount,
            current_amount: input.initial_amount,
            status: GoalStatus::Active,
            lock_funds: input.lock_funds,
            reserved_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether accumulated contributions have reached the target.
    #[must_use]
    pub fn target_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}
