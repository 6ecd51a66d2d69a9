//! User data types.

use chrono::{DateTime, Utc};
use finbook_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email address, unique across users at creation time.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Partial update for a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
}

impl User {
    /// Builds a user with a fresh ID and current timestamps.
    #[must_use]
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }
}
