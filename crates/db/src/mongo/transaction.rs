//! MongoDB transaction repository.
//!
//! Search criteria translate straight into a find filter; totals run as
//! a two-bucket aggregation so the sums happen server-side.

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use finbook_core::transaction::{
    SortField, SortOrder, Transaction, TransactionPatch, TransactionQuery, TransactionRepository,
    TransactionTotals,
};
use finbook_shared::{
    AppResult,
    types::{TransactionId, UserId},
};

use super::db_err;
use crate::documents::{TRANSACTIONS, TransactionDocument, from_minor, to_minor};

/// Transaction repository over the `transactions` collection.
#[derive(Debug, Clone)]
pub struct MongoTransactionRepository {
    collection: Collection<TransactionDocument>,
}

impl MongoTransactionRepository {
    /// Creates the repository over a database handle.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(TRANSACTIONS),
        }
    }

    fn search_filter(user_id: UserId, query: &TransactionQuery) -> AppResult<Document> {
        let mut filter = doc! { "user_id": user_id.into_inner() };

        let mut date_range = Document::new();
        if let Some(from) = query.from {
            date_range.insert("$gte", bson::DateTime::from_chrono(from));
        }
        if let Some(to) = query.to {
            date_range.insert("$lte", bson::DateTime::from_chrono(to));
        }
        if !date_range.is_empty() {
            filter.insert("date", date_range);
        }

        if let Some(category) = &query.category {
            filter.insert("category", category.as_str());
        }

        let mut amount_range = Document::new();
        if let Some(min) = query.min_amount {
            amount_range.insert("$gte", to_minor(min)?);
        }
        if let Some(max) = query.max_amount {
            amount_range.insert("$lte", to_minor(max)?);
        }
        if !amount_range.is_empty() {
            filter.insert("amount_minor", amount_range);
        }

        if !query.tags.is_empty() {
            filter.insert("tags", doc! { "$all": query.tags.clone() });
        }

        Ok(filter)
    }

    fn search_sort(query: &TransactionQuery) -> Document {
        let field = match query.sort_by {
            SortField::Date => "date",
            SortField::Amount => "amount_minor",
        };
        let direction = match query.order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        let mut sort = Document::new();
        sort.insert(field, direction);
        sort
    }
}

#[async_trait]
impl TransactionRepository for MongoTransactionRepository {
    async fn insert(&self, tx: &Transaction) -> AppResult<()> {
        let document = TransactionDocument::try_from(tx)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(found.map(Transaction::from))
    }

    async fn search(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> AppResult<Vec<Transaction>> {
        let filter = Self::search_filter(user_id, query)?;
        let cursor = self
            .collection
            .find(filter)
            .sort(Self::search_sort(query))
            .await
            .map_err(db_err)?;
        let docs: Vec<TransactionDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(Transaction::from).collect())
    }

    async fn totals_for_user(&self, user_id: UserId) -> AppResult<TransactionTotals> {
        // Transfers land in the expense bucket alongside expenses.
        let pipeline = vec![
            doc! { "$match": { "user_id": user_id.into_inner() } },
            doc! { "$group": {
                "_id": { "$cond": [{ "$eq": ["$kind", "income"] }, "income", "expense"] },
                "total": { "$sum": "$amount_minor" },
            } },
        ];

        let cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(db_err)?;
        let buckets: Vec<Document> = cursor.try_collect().await.map_err(db_err)?;

        let mut totals = TransactionTotals::default();
        for bucket in buckets {
            let sum = match bucket.get("total") {
                Some(Bson::Int64(minor)) => from_minor(*minor),
                Some(Bson::Int32(minor)) => from_minor(i64::from(*minor)),
                _ => continue,
            };
            match bucket.get_str("_id") {
                Ok("income") => totals.income = sum,
                Ok("expense") => totals.expense = sum,
                _ => {}
            }
        }
        Ok(totals)
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Option<Transaction>> {
        let mut set = Document::new();
        if let Some(amount) = patch.amount {
            set.insert("amount_minor", to_minor(amount)?);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(category) = patch.category {
            match category {
                Some(category) => set.insert("category", category),
                None => set.insert("category", Bson::Null),
            };
        }
        if let Some(tags) = patch.tags {
            set.insert("tags", tags);
        }
        if let Some(date) = patch.date {
            set.insert("date", bson::DateTime::from_chrono(date));
        }
        if set.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.into_inner() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Transaction::from))
    }

    async fn delete(&self, id: TransactionId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }
}
