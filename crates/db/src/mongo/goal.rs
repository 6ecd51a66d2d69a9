//! MongoDB goal repository.

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use rust_decimal::Decimal;

use finbook_core::goal::{Goal, GoalPatch, GoalRepository};
use finbook_shared::{
    AppResult,
    types::{GoalId, UserId},
};

use super::db_err;
use crate::documents::{GOALS, GoalDocument, to_minor};

/// Goal repository over the `goals` collection.
#[derive(Debug, Clone)]
pub struct MongoGoalRepository {
    collection: Collection<GoalDocument>,
}

impl MongoGoalRepository {
    /// Creates the repository over a database handle.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(GOALS),
        }
    }

    async fn increment(&self, id: GoalId, field: &str, delta: Decimal) -> AppResult<Option<Goal>> {
        let mut inc = bson::Document::new();
        inc.insert(field, to_minor(delta)?);

        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.into_inner() },
                doc! {
                    "$inc": inc,
                    "$set": { "updated_at": bson::DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Goal::from))
    }
}

#[async_trait]
impl GoalRepository for MongoGoalRepository {
    async fn insert(&self, goal: &Goal) -> AppResult<()> {
        let document = GoalDocument::try_from(goal)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: GoalId) -> AppResult<Option<Goal>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(found.map(Goal::from))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Goal>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.into_inner() })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(db_err)?;
        let docs: Vec<GoalDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(Goal::from).collect())
    }

    async fn update(&self, id: GoalId, patch: GoalPatch) -> AppResult<Option<Goal>> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(target) = patch.target_amount {
            set.insert("target_minor", to_minor(target)?);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.into_inner() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Goal::from))
    }

    async fn delete(&self, id: GoalId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }

    async fn increment_progress(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>> {
        self.increment(id, "current_minor", delta).await
    }

    async fn adjust_reserved(&self, id: GoalId, delta: Decimal) -> AppResult<Option<Goal>> {
        self.increment(id, "reserved_minor", delta).await
    }

    async fn complete(&self, id: GoalId) -> AppResult<Option<Goal>> {
        // Status flip and reservation reset ride one document write.
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id.into_inner() },
                doc! { "$set": {
                    "status": "completed",
                    "reserved_minor": 0i64,
                    "updated_at": bson::DateTime::now(),
                } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Goal::from))
    }
}
