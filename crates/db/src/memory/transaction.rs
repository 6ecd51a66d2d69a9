//! In-memory transaction repository.

use async_trait::async_trait;
use dashmap::DashMap;

use finbook_core::transaction::{
    Transaction, TransactionPatch, TransactionQuery, TransactionRepository, TransactionTotals,
};
use finbook_shared::{
    AppResult,
    types::{TransactionId, UserId},
};

/// Transaction repository over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryTransactionRepository {
    items: DashMap<TransactionId, Transaction>,
}

impl MemoryTransactionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for MemoryTransactionRepository {
    async fn insert(&self, tx: &Transaction) -> AppResult<()> {
        self.items.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn search(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> AppResult<Vec<Transaction>> {
        let mut matches: Vec<Transaction> = self
            .items
            .iter()
            .filter(|entry| entry.user_id == user_id && query.matches(entry))
            .map(|entry| entry.clone())
            .collect();
        query.apply_sort(&mut matches);
        Ok(matches)
    }

    async fn totals_for_user(&self, user_id: UserId) -> AppResult<TransactionTotals> {
        let mut totals = TransactionTotals::default();
        for entry in &self.items {
            if entry.user_id != user_id {
                continue;
            }
            if entry.kind.is_outflow() {
                totals.expense += entry.amount;
            } else {
                totals.income += entry.amount;
            }
        }
        Ok(totals)
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Option<Transaction>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(amount) = patch.amount {
            entry.amount = amount;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(category) = patch.category {
            entry.category = category;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(date) = patch.date {
            entry.date = date;
        }
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: TransactionId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }
}
