//! Input validation rules for user/role payloads.
//!
//! These are deterministic, pure checks; the API layer calls them before
//! touching any store.

use crate::{DomainError, DomainResult};

/// Names must be at least 3 characters.
pub fn name(value: &str) -> DomainResult<()> {
    if value.chars().count() < 3 {
        return Err(DomainError::validation("name must be at least 3 characters"));
    }
    Ok(())
}

/// Emails must be at least 6 characters and look like `local@domain.tld`.
pub fn email(value: &str) -> DomainResult<()> {
    if value.chars().count() < 6 {
        return Err(DomainError::validation("email must be at least 6 characters"));
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(DomainError::validation("email must be a valid address"));
    };

    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());

    if local.is_empty() || !domain_ok || value.contains(' ') {
        return Err(DomainError::validation("email must be a valid address"));
    }
    Ok(())
}

/// Passwords must be at least 6 characters and contain only letters, digits,
/// and the characters `@`, `#`, `$`.
pub fn password(value: &str) -> DomainResult<()> {
    if value.chars().count() < 6 {
        return Err(DomainError::validation(
            "password must be at least 6 characters",
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '#' | '$'))
    {
        return Err(DomainError::validation(
            "password may only contain letters, digits, and @, #, $",
        ));
    }
    Ok(())
}

/// Role names share the user-name rule.
pub fn role_name(value: &str) -> DomainResult<()> {
    name(value)
}
