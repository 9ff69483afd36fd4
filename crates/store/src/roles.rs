//! Role repository, same shape as [`crate::users`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use granite_core::Role;

use crate::error::{StoreError, StoreResult};

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RolePatch {
    pub name: Option<String>,
}

/// In-memory role store (dev/test default).
#[derive(Debug)]
pub struct InMemoryRoleStore {
    inner: Mutex<HashMap<i64, Role>>,
    next_id: AtomicI64,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn list(&self) -> Vec<Role> {
        let inner = self.inner.lock().unwrap();
        let mut roles: Vec<Role> = inner.values().filter(|r| !r.is_deleted()).cloned().collect();
        roles.sort_by_key(|r| r.id);
        roles
    }

    pub fn get(&self, id: i64) -> Option<Role> {
        let inner = self.inner.lock().unwrap();
        inner.get(&id).filter(|r| !r.is_deleted()).cloned()
    }

    pub fn create(&self, name: String) -> Role {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let role = Role {
            id,
            name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.inner.lock().unwrap().insert(id, role.clone());
        role
    }

    pub fn update(&self, id: i64, patch: RolePatch) -> StoreResult<Role> {
        let mut inner = self.inner.lock().unwrap();
        let role = inner
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or(StoreError::NotFound)?;

        if let Some(name) = patch.name {
            role.name = name;
        }
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    pub fn soft_delete(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let role = inner
            .get_mut(&id)
            .filter(|r| !r.is_deleted())
            .ok_or(StoreError::NotFound)?;
        role.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// Storage-agnostic role store handed to the API layer.
pub enum RoleStore {
    InMemory(InMemoryRoleStore),
    #[cfg(feature = "postgres")]
    Postgres(crate::postgres::PgRoleStore),
}

impl RoleStore {
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryRoleStore::new())
    }

    pub async fn list(&self) -> StoreResult<Vec<Role>> {
        match self {
            Self::InMemory(s) => Ok(s.list()),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.list().await,
        }
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Role>> {
        match self {
            Self::InMemory(s) => Ok(s.get(id)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.get(id).await,
        }
    }

    pub async fn create(&self, name: String) -> StoreResult<Role> {
        match self {
            Self::InMemory(s) => Ok(s.create(name)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.create(name).await,
        }
    }

    pub async fn update(&self, id: i64, patch: RolePatch) -> StoreResult<Role> {
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
