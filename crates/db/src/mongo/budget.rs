//! MongoDB budget repository.
//!
//! Period dates are stored as ISO `YYYY-MM-DD` strings; `$lte`/`$gte`
//! on them compare lexicographically, which is date order for this
//! format. The overlap filter mirrors the core predicate exactly: an
//! existing period must contain one of the candidate's endpoints.

use async_trait::async_trait;
use bson::doc;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use rust_decimal::Decimal;

use finbook_core::budget::{Budget, BudgetPatch, BudgetRepository};
use finbook_shared::{
    AppResult,
    types::{BudgetId, UserId},
};

use super::db_err;
use crate::documents::{BUDGETS, BudgetDocument, to_minor};

/// Budget repository over the `budgets` collection.
#[derive(Debug, Clone)]
pub struct MongoBudgetRepository {
    collection: Collection<BudgetDocument>,
}

impl MongoBudgetRepository {
    /// Creates the repository over a database handle.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(BUDGETS),
        }
    }
}

#[async_trait]
impl BudgetRepository for MongoBudgetRepository {
    async fn insert(&self, budget: &Budget) -> AppResult<()> {
        let document = BudgetDocument::try_from(budget)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: BudgetId) -> AppResult<Option<Budget>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(found.map(Budget::from))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Budget>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.into_inner() })
            .sort(doc! { "period_start": 1 })
            .await
            .map_err(db_err)?;
        let docs: Vec<BudgetDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(Budget::from).collect())
    }

    async fn find_for_day(
        &self,
        user_id: UserId,
        category: &str,
        day: NaiveDate,
    ) -> AppResult<Option<Budget>> {
        let day = day.to_string();
        let found = self
            .collection
            .find_one(doc! {
                "user_id": user_id.into_inner(),
                "category": category,
                "period_start": { "$lte": &day },
                "period_end": { "$gte": &day },
            })
            .await
            .map_err(db_err)?;
        Ok(found.map(Budget::from))
    }

    async fn overlap_exists(
        &self,
        user_id: UserId,
        category: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> AppResult<bool> {
        let start = period_start.to_string();
        let end = period_end.to_string();
        let found = self
            .collection
            .find_one(doc! {
                "user_id": user_id.into_inner(),
                "category": category,
                "$or": [
                    { "period_start": { "$lte": &start }, "period_end": { "$gte": &start } },
                    { "period_start": { "$lte": &end }, "period_end": { "$gte": &end } },
                ],
            })
            .await
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn update(&self, id: BudgetId, patch: BudgetPatch) -> AppResult<Option<Budget>> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(category) = patch.category {
            set.insert("category", category);
        }
        if let Some(start) = patch.period_start {
            set.insert("period_start", start.to_string());
        }
        if let Some(end) = patch.period_end {
            set.insert("period_end", end.to_string());
        }
        if let Some(limit) = patch.limit_amount {
            set.insert("limit_minor", to_minor(limit)?);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.into_inner() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Budget::from))
    }

    async fn delete(&self, id: BudgetId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }

    async fn increment_spent(&self, id: BudgetId, delta: Decimal) -> AppResult<Option<Budget>> {
        let delta_minor = to_minor(delta)?;
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.into_inner() },
                doc! {
                    "$inc": { "spent_minor": delta_minor },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Budget::from))
    }
}
