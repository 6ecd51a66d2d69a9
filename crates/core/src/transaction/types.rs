//! Transaction data types and search queries.

use chrono::{DateTime, Utc};
use finbook_shared::types::{AccountId, GoalId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money entering the account.
    Income,
    /// Money leaving the account.
    Expense,
    /// Money leaving the account toward elsewhere. Behaves as an
    /// outflow; there is no destination-account field and no credit on
    /// the other side.
    Transfer,
}

impl TransactionKind {
    /// Whether this kind is expense-classified (`expense` or
    /// `transfer`): it debits the account and must fit into spendable
    /// funds.
    #[must_use]
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::Expense | Self::Transfer)
    }
}

/// A posted transaction.
///
/// Side effects (balance, budget, goal) are applied exactly once, at
/// posting time; later updates and deletes touch only the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Posting user.
    pub user_id: UserId,
    /// Affected account.
    pub account_id: AccountId,
    /// Amount, always positive; the kind decides the sign of the effect.
    pub amount: Decimal,
    /// Transaction kind. Immutable after posting.
    pub kind: TransactionKind,
    /// Spending category, if any.
    pub category: Option<String>,
    /// Goal this posting contributes to, if any. Immutable after posting.
    pub goal_id: Option<GoalId>,
    /// Free-text description.
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Event timestamp (when the money moved, not when it was recorded).
    pub date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for posting a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Posting user.
    pub user_id: UserId,
    /// Affected account.
    pub account_id: AccountId,
    /// Amount, positive.
    pub amount: Decimal,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Spending category.
    pub category: Option<String>,
    /// Goal to contribute to.
    pub goal_id: Option<GoalId>,
    /// Free-text description.
    pub description: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Event timestamp; defaults to now.
    pub date: Option<DateTime<Utc>>,
}

/// Partial update for a transaction. `None` fields are left unchanged.
///
/// Classification fields (`kind`, `account_id`, `user_id`, `goal_id`)
/// are absent on purpose: they are immutable after posting. `category`
/// is doubly optional so "leave unchanged" and "clear" stay distinct.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    /// New amount. Does not re-run posting side effects.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New category; `Some(None)` clears it.
    pub category: Option<Option<String>>,
    /// New tag set, replacing the old one.
    pub tags: Option<Vec<String>>,
    /// New event timestamp.
    pub date: Option<DateTime<Utc>>,
}

/// Sortable fields for transaction search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Event timestamp.
    #[default]
    Date,
    /// Transaction amount.
    Amount,
}

/// Sort direction for transaction search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// Search criteria for a user's transactions.
///
/// Every criterion is optional and they combine conjunctively. Ranges
/// are inclusive on both ends; tags match as a superset (the
/// transaction must carry *all* queried tags). The default sort is
/// event date, newest first.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Earliest event timestamp, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Latest event timestamp, inclusive.
    pub to: Option<DateTime<Utc>>,
    /// Exact category match.
    pub category: Option<String>,
    /// Smallest amount, inclusive.
    pub min_amount: Option<Decimal>,
    /// Largest amount, inclusive.
    pub max_amount: Option<Decimal>,
    /// Tags the transaction must all carry; empty means no constraint.
    pub tags: Vec<String>,
    /// Sort field.
    pub sort_by: SortField,
    /// Sort direction.
    pub order: SortOrder,
}

impl TransactionQuery {
    /// Whether a transaction satisfies every criterion of this query.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.from
            && tx.date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && tx.date > to
        {
            return false;
        }
        if let Some(category) = &self.category
            && tx.category.as_deref() != Some(category.as_str())
        {
            return false;
        }
        if let Some(min) = self.min_amount
            && tx.amount < min
        {
            return false;
        }
        if let Some(max) = self.max_amount
            && tx.amount > max
        {
            return false;
        }
        self.tags.iter().all(|tag| tx.tags.contains(tag))
    }

    /// Sorts transactions per the query's field and direction.
    pub fn apply_sort(&self, items: &mut [Transaction]) {
        items.sort_by(|a, b| {
            let ord = match self.sort_by {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Amount => a.amount.cmp(&b.amount),
            };
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
}

/// Per-user income and expense totals.
///
/// Grouping follows posting classification: `expense` covers both
/// `expense` and `transfer` kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionTotals {
    /// Sum over income-classified transactions.
    pub income: Decimal,
    /// Sum over expense-classified transactions.
    pub expense: Decimal,
}

impl Transaction {
    /// Builds a transaction with a fresh ID and current timestamps; the
    /// event date defaults to the posting moment.
    #[must_use]
    pub fn new(input: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id: input.user_id,
            account_id: input.account_id,
            amount: input.amount,
            kind: input.kind,
            category: input.category,
            goal_id: input.goal_id,
            description: input.description,
            tags: input.tags,
            date: input.date.unwrap_or(now),
            created_at: now,
        }
    }
}
