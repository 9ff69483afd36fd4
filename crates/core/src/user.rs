//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account.
///
/// # Invariants
/// - `email` is unique among non-deleted users (enforced by the store).
/// - `password_hash` is never serialized into API responses (`skip_serializing`).
/// - Deletion is soft: `deleted_at` is set and the row is excluded from reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub role_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
