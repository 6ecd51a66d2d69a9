//! In-memory user repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use finbook_core::user::{User, UserPatch, UserRepository};
use finbook_shared::{AppResult, types::UserId};

/// User repository over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    items: DashMap<UserId, User>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.items.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .items
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.clone()))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.items.iter().map(|entry| entry.clone()).collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> AppResult<Option<User>> {
        let Some(mut entry) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            entry.email = email;
        }
        if let Some(name) = patch.name {
            entry.name = name;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }
}
