//! # Permissions
//!
//! Fine-grained actions and the static table granting them to roles.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::roles::Role;

/// An action a role may be allowed to perform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View user records.
    Read,

    /// Modify user records.
    Write,

    /// Remove user records.
    Delete,

    /// Administrative operations.
    Admin,
}

impl Permission {
    /// All permissions.
    pub fn all() -> [Permission; 4] {
        [
            Permission::Read,
            Permission::Write,
            Permission::Delete,
            Permission::Admin,
        ]
    }

    /// Get the string representation of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Admin => "admin",
        }
    }

    /// Parse a permission name.
    ///
    /// Names are matched exactly; `"Read"` is not a permission.
    ///
    /// # Example
    ///
    /// ```
    /// use account_rbac::Permission;
    ///
    /// assert_eq!(Permission::parse("delete"), Some(Permission::Delete));
    /// assert_eq!(Permission::parse("execute"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "delete" => Some(Permission::Delete),
            "admin" => Some(Permission::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static mapping from role to the set of permissions it holds.
///
/// Built once at startup and only read afterwards, so a single instance can
/// be shared by every request.
///
/// # Example
///
/// ```
/// use account_rbac::{Permission, PermissionTable, Role};
///
/// let table = PermissionTable::standard();
/// assert!(table.check(Role::Admin, Permission::Delete));
/// assert!(!table.check(Role::User, Permission::Write));
/// ```
#[derive(Debug, Clone)]
pub struct PermissionTable {
    grants: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionTable {
    /// The account service's permission table.
    pub fn standard() -> Self {
        let mut grants = HashMap::new();
        grants.insert(Role::Admin, Permission::all().into_iter().collect());
        grants.insert(
            Role::Moderator,
            [Permission::Read, Permission::Write].into_iter().collect(),
        );
        grants.insert(Role::User, [Permission::Read].into_iter().collect());
        Self { grants }
    }

    /// Check whether `role` is granted `permission`.
    pub fn check(&self, role: Role, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|set| set.contains(&permission))
    }

    /// Check a permission given by name.
    ///
    /// Unknown names are never granted.
    pub fn check_named(&self, role: Role, permission: &str) -> bool {
        Permission::parse(permission).is_some_and(|p| self.check(role, p))
    }

    /// Get the permissions granted to a role, in declaration order.
    pub fn permissions_for(&self, role: Role) -> Vec<Permission> {
        self.grants
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}
