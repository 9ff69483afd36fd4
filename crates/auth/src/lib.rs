//! `granite-auth` — authentication boundary: JWT claims, token issuance and
//! verification, and the file-persisted token blacklist consulted on every
//! authenticated request.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod blacklist;
pub mod claims;
pub mod gate;

pub use blacklist::{BlacklistEntry, TokenBlacklist};
pub use claims::{Claims, TOKEN_TTL_HOURS, issue_token};
pub use gate::{AuthError, AuthGate};
