//! `granite-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod role;
pub mod user;
pub mod validate;

pub use error::{DomainError, DomainResult};
pub use role::Role;
pub use user::User;
