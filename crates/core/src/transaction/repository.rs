//! Persistence contract for transactions.

use async_trait::async_trait;
use finbook_shared::{
    AppResult,
    types::{TransactionId, UserId},
};

use super::types::{Transaction, TransactionPatch, TransactionQuery, TransactionTotals};

/// Storage operations the transaction service relies on.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persists a posted transaction.
    async fn insert(&self, tx: &Transaction) -> AppResult<()>;

    /// Looks up a transaction by ID.
    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>>;

    /// Searches a user's transactions per the query's criteria and sort.
    async fn search(&self, user_id: UserId, query: &TransactionQuery)
    -> AppResult<Vec<Transaction>>;

    /// Income and expense sums over a user's transactions.
    async fn totals_for_user(&self, user_id: UserId) -> AppResult<TransactionTotals>;

    /// Applies a partial update, returning the refreshed transaction.
    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Option<Transaction>>;

    /// Deletes a transaction, returning whether a document was removed.
    async fn delete(&self, id: TransactionId) -> AppResult<bool>;
}
