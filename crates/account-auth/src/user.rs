//! User records and their public projection

use account_rbac::Role;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Numeric user identifier, assigned by the credential store.
pub type UserId = i64;

/// A stored user account.
///
/// The role is not part of the record; see [`User::role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned id
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Normalized (lowercase) email, unique across users
    pub email: String,

    /// PHC-format password hash
    pub password_hash: String,
}

impl User {
    /// Role derived from the current email.
    pub fn role(&self) -> Role {
        Role::resolve(&self.email)
    }

    /// Public view of the record.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Fields of a user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial replacement of a stored user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Canonical form of an email address: trimmed and lowercased.
///
/// Uniqueness, login and role inference all compare canonical emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Syntactic check of a (normalized) email address.
///
/// Requires exactly one `@`, a non-empty local part and a dotted domain with
/// no empty labels. No whitespace anywhere.
pub fn validate_email(email: &str) -> AuthResult<()> {
    let invalid = || AuthError::InvalidInput(format!("'{}' is not a valid email address", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    Ok(())
}

/// Reject empty (or whitespace-only) required text fields.
pub fn require_non_empty(field: &str, value: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
