//! Roles derived from user identity
//!
//! There is no role column anywhere. A user's role is a pure function of
//! their email address, evaluated fresh on every authorization check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse authorization category of a user.
///
/// The ordering follows privilege: `User < Moderator < Admin`.
///
/// # Examples
///
/// ```
/// use account_rbac::Role;
///
/// assert_eq!(Role::resolve("root-admin@example.com"), Role::Admin);
/// assert_eq!(Role::resolve("alice@example.com"), Role::User);
/// assert!(Role::Admin > Role::Moderator);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only access to user records
    User = 0,

    /// Can read and edit user records
    Moderator = 1,

    /// Full control, including deletion
    Admin = 2,
}

impl Role {
    /// All roles, lowest privilege first.
    pub fn all() -> [Role; 3] {
        [Role::User, Role::Moderator, Role::Admin]
    }

    /// Derive the role for an email address.
    ///
    /// Case-insensitive substring match in fixed priority order:
    /// `"admin"` wins over `"mod"`, anything else is a plain user.
    ///
    /// Substring matching means `modern@example.com` resolves to
    /// [`Role::Moderator`]. That is the established behavior and changing it
    /// changes who may write user records.
    ///
    /// # Examples
    ///
    /// ```
    /// use account_rbac::Role;
    ///
    /// assert_eq!(Role::resolve("ADMIN@example.com"), Role::Admin);
    /// assert_eq!(Role::resolve("modern@example.com"), Role::Moderator);
    /// ```
    pub fn resolve(email: &str) -> Self {
        let email = email.to_lowercase();
        if email.contains("admin") {
            Role::Admin
        } else if email.contains("mod") {
            Role::Moderator
        } else {
            Role::User
        }
    }

    /// Parse role from its string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "moderator" => Some(Self::Moderator),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Lowercase string representation, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}
