//! User management rules.

use std::sync::Arc;

use finbook_shared::{AppError, AppResult, types::UserId};

use super::repository::UserRepository;
use super::types::{NewUser, User, UserPatch};

/// User service: registration and CRUD.
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates the service over a user repository.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a user.
    ///
    /// Email uniqueness is enforced here, at creation time only; later
    /// email updates are merged without a re-check.
    pub async fn create(&self, input: NewUser) -> AppResult<User> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::BusinessRule(format!(
                "email '{}' is already registered",
                input.email
            )));
        }

        let user = User::new(input);
        self.users.insert(&user).await?;
        Ok(user)
    }

    /// Fetches a user by ID.
    pub async fn get(&self, id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))
    }

    /// Lists all users.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    /// Applies a partial update to a user.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> AppResult<User> {
        self.users
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))
    }

    /// Deletes a user.
    pub async fn delete(&self, id: UserId) -> AppResult<()> {
        if self.users.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("user {id} not found")))
        }
    }
}
