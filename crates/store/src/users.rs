//! User repository: in-memory implementation plus the storage-agnostic
//! [`UserStore`] dispatch enum.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use granite_core::User;

use crate::error::{StoreError, StoreResult};

/// Fields required to create a user. The password arrives pre-hashed; the
/// store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<i64>,
}

/// In-memory user store (dev/test default).
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: Mutex<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// All non-deleted users, ordered by id.
    pub fn list(&self) -> Vec<User> {
        let inner = self.inner.lock().unwrap();
        let mut users: Vec<User> = inner.values().filter(|u| !u.is_deleted()).cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub fn get(&self, id: i64) -> Option<User> {
        let inner = self.inner.lock().unwrap();
        inner.get(&id).filter(|u| !u.is_deleted()).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.lock().unwrap();
        inner
            .values()
            .find(|u| !u.is_deleted() && u.email == email)
            .cloned()
    }

    /// Whether an active user other than `excluding` already uses `email`.
    pub fn email_taken(&self, email: &str, excluding: Option<i64>) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .values()
            .any(|u| !u.is_deleted() && u.email == email && Some(u.id) != excluding)
    }

    pub fn create(&self, new: NewUser) -> User {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let user = User {
            id,
            role_id: new.role_id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.inner.lock().unwrap().insert(id, user.clone());
        user
    }

    pub fn update(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .get_mut(&id)
            .filter(|u| !u.is_deleted())
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(role_id) = patch.role_id {
            user.role_id = role_id;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn soft_delete(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .get_mut(&id)
            .filter(|u| !u.is_deleted())
            .ok_or(StoreError::NotFound)?;
        user.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// Storage-agnostic user store handed to the API layer.
pub enum UserStore {
    InMemory(InMemoryUserStore),
    #[cfg(feature = "postgres")]
    Postgres(crate::postgres::PgUserStore),
}

impl UserStore {
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryUserStore::new())
    }

    pub async fn list(&self) -> StoreResult<Vec<User>> {
        match self {
            Self::InMemory(s) => Ok(s.list()),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.list().await,
        }
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        match self {
            Self::InMemory(s) => Ok(s.get(id)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.get(id).await,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        match self {
            Self::InMemory(s) => Ok(s.find_by_email(email)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.find_by_email(email).await,
        }
    }

    pub async fn email_taken(&self, email: &str, excluding: Option<i64>) -> StoreResult<bool> {
        match self {
            Self::InMemory(s) => Ok(s.email_taken(email, excluding)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.email_taken(email, excluding).await,
        }
    }

    pub async fn create(&self, new: NewUser) -> StoreResult<User> {
        match self {
            Self::InMemory(s) => Ok(s.create(new)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.create(new).await,
        }
    }

    pub async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        match self {
            Self::InMemory(s) => s.update(id, patch),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.update(id, patch).await,
        }
    }

    pub async fn soft_delete(&self, id: i64) -> StoreResult<()> {
        match self {
            Self::InMemory(s) => s.soft_delete(id),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.soft_delete(id).await,
        }
    }
}
