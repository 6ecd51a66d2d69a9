//! MongoDB account repository.

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use rust_decimal::Decimal;

use finbook_core::account::{Account, AccountPatch, AccountRepository};
use finbook_shared::{
    AppResult,
    types::{AccountId, UserId},
};

use super::db_err;
use crate::documents::{ACCOUNTS, AccountDocument, to_minor};

/// Account repository over the `accounts` collection.
///
/// Balance and lock adjustments are `$inc` updates on minor units; the
/// refreshed document comes back from the same round trip.
#[derive(Debug, Clone)]
pub struct MongoAccountRepository {
    collection: Collection<AccountDocument>,
}

impl MongoAccountRepository {
    /// Creates the repository over a database handle.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ACCOUNTS),
        }
    }

    async fn increment(
        &self,
        id: AccountId,
        field: &str,
        delta: Decimal,
    ) -> AppResult<Option<Account>> {
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
        Ok(updated.map(Account::from))
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    async fn insert(&self, account: &Account) -> AppResult<()> {
        let document = AccountDocument::try_from(account)?;
        self.collection
            .insert_one(document)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(found.map(Account::from))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Account>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id.into_inner() })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(db_err)?;
        let docs: Vec<AccountDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(Account::from).collect())
    }

    async fn update(&self, id: AccountId, patch: AccountPatch) -> AppResult<Option<Account>> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = patch.name {
            set.insert("name", name);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.into_inner() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(Account::from))
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }

    async fn adjust_balance(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>> {
        self.increment(id, "balance_minor", delta).await
    }

    async fn adjust_locked(&self, id: AccountId, delta: Decimal) -> AppResult<Option<Account>> {
        self.increment(id, "goal_locked_minor", delta).await
    }
}
