//! MongoDB user repository.

use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use finbook_core::user::{User, UserPatch, UserRepository};
use finbook_shared::{AppResult, types::UserId};

use super::db_err;
use crate::documents::{USERS, UserDocument};

/// User repository over the `users` collection.
#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Creates the repository over a database handle.
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.collection
            .insert_one(UserDocument::from(user))
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(found.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(db_err)?;
        Ok(found.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(db_err)?;
        let docs: Vec<UserDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> AppResult<Option<User>> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(email) = patch.email {
            set.insert("email", email);
        }
        if let Some(name) = patch.name {
            set.insert("name", name);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.into_inner() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;
        Ok(updated.map(User::from))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.into_inner() })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }
}
