//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where an
//! `AccountId` is expected. Each wraps a MongoDB ObjectId.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub ObjectId);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Creates an ID from an existing ObjectId.
            #[must_use]
            pub const fn from_object_id(oid: ObjectId) -> Self {
                Self(oid)
            }

            /// Returns the inner ObjectId.
            #[must_use]
            pub const fn into_inner(self) -> ObjectId {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = bson::oid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(ObjectId::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(BudgetId, "Unique identifier for a budget.");
typed_id!(GoalId, "Unique identifier for a savings goal.");
typed_id!(TransactionId, "Unique identifier for a transaction.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_roundtrip() {
        let id = UserId::new();
        let parsed = UserId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert!(AccountId::from_str("not-an-object-id").is_err());
        assert!(AccountId::from_str("").is_err());
    }

    #[test]
    fn test_distinct_types_share_format() {
        let oid = ObjectId::new();
        let user = UserId::from_object_id(oid);
        let account = AccountId::from_object_id(oid);
        assert_eq!(user.to_string(), account.to_string());
        assert_eq!(user.into_inner(), account.into_inner());
    }

    #[test]
    fn test_json_uses_extended_object_id() {
        // Plain serde_json sees the raw ObjectId representation; API
        // responses therefore format ids via Display instead.
        let id = GoalId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!({ "$oid": id.to_string() }));
    }
}
