//! JWT claims model and HS256 encode/decode.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid, in hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by every issued token.
///
/// `exp` is seconds since the Unix epoch, as required by the JWT spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id.
    pub id: i64,

    /// Subject email.
    pub email: String,

    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issue a signed HS256 token for `(id, email)`, expiring [`TOKEN_TTL_HOURS`]
/// from now.
pub fn issue_token(
    secret: &str,
    id: i64,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        id,
        email: email.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify a token: HS256 only, signature and `exp` checked.
pub(crate) fn decode_token(
    secret: &str,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips() {
        let token = issue_token("test-secret", 7, "alice@example.com").unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = issue_token("test-secret", 7, "alice@example.com").unwrap();
        assert!(decode_token("other-secret", &token).is_err());
    }
}
