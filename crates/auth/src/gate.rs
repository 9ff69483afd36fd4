//! Authentication gate: admit or reject a request based on its bearer
//! credential, and revoke credentials at logout.

use std::sync::Arc;

use chrono::DateTime;
use thiserror::Error;

use crate::blacklist::TokenBlacklist;
use crate::claims::{Claims, decode_token};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Header absent, or not carrying the `Bearer ` scheme.
    #[error("authorization header with Bearer token required")]
    MissingCredential,

    /// Token was revoked (logged out) before its natural expiry.
    #[error("token has been logged out")]
    Revoked,

    /// Token header names a signing algorithm other than HS256.
    #[error("unsupported signing algorithm")]
    InvalidSignature,

    /// Malformed, tampered, or expired token.
    #[error("invalid token")]
    InvalidToken,
}

/// Gate in front of every protected operation.
///
/// Holds the process-wide symmetric secret and a shared handle to the
/// revocation registry.
#[derive(Clone)]
pub struct AuthGate {
    secret: String,
    blacklist: Arc<TokenBlacklist>,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>, blacklist: Arc<TokenBlacklist>) -> Self {
        Self {
            secret: secret.into(),
            blacklist,
        }
    }

    pub fn blacklist(&self) -> &Arc<TokenBlacklist> {
        &self.blacklist
    }

    /// The process-wide signing secret (shared with token issuance).
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Validate the `Authorization` header value of an incoming request.
    ///
    /// Revocation is checked before signature verification: a logged-out
    /// token is rejected as [`AuthError::Revoked`] even if it would
    /// otherwise verify.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = bearer_token(header)?;

        if self.blacklist.is_revoked(token) {
            return Err(AuthError::Revoked);
        }

        decode_token(&self.secret, token).map_err(map_decode_error)
    }

    /// Revoke the credential in the `Authorization` header (logout).
    ///
    /// The header must carry the `Bearer ` scheme, same as
    /// [`authenticate`](Self::authenticate). The token's signature is
    /// verified first; an invalid token is never inserted into the
    /// registry. On success the entry expires exactly when the token's
    /// `exp` claim says it does.
    pub fn revoke(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = bearer_token(header)?;

        let claims = decode_token(&self.secret, token).map_err(map_decode_error)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?;

        self.blacklist.insert(token, expires_at);
        Ok(())
    }
}

/// Strict bearer extraction: the literal `Bearer ` prefix is required.
fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingCredential)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::InvalidSignature
        }
        _ => AuthError::InvalidToken,
    }
}
