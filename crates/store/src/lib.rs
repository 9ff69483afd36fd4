//! `granite-store` — user/role repositories.
//!
//! In-memory stores are always available (dev/test); the `postgres` feature
//! adds sqlx-backed twins with identical semantics. Callers go through the
//! [`UserStore`]/[`RoleStore`] enums so handler code is storage-agnostic.

pub mod error;
pub mod roles;
pub mod users;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{StoreError, StoreResult};
pub use roles::{InMemoryRoleStore, RolePatch, RoleStore};
pub use users::{InMemoryUserStore, NewUser, UserPatch, UserStore};
