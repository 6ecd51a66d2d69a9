//! Persistence contract for users.

use async_trait::async_trait;
use finbook_shared::{AppResult, types::UserId};

use super::types::{User, UserPatch};

/// Storage operations the user service relies on.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a freshly-built user.
    async fn insert(&self, user: &User) -> AppResult<()>;

    /// Looks up a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Looks up a user by exact email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Lists all users.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Applies a partial update, returning the refreshed user.
    async fn update(&self, id: UserId, patch: UserPatch) -> AppResult<Option<User>>;

    /// Deletes a user, returning whether a document was removed.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}
