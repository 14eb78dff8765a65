//! Guard predicates
//!
//! A [`Requirement`] is what a protected operation demands of the caller's
//! role. Requirements are plain values so they can be declared next to the
//! handler they protect and checked by a single guard.

use std::collections::BTreeSet;
use std::fmt;

use crate::permissions::{Permission, PermissionTable};
use crate::roles::Role;

/// Authorization demanded by a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any authenticated user.
    Authenticated,

    /// The caller's role must be one of these.
    AnyRole(BTreeSet<Role>),

    /// The permission table must grant this permission to the caller's role.
    Permission(Permission),
}

impl Requirement {
    /// Require membership in a set of roles.
    ///
    /// # Example
    ///
    /// ```
    /// use account_rbac::{PermissionTable, Requirement, Role};
    ///
    /// let table = PermissionTable::standard();
    /// let admins = Requirement::any_role([Role::Admin]);
    /// assert!(admins.is_satisfied_by(Role::Admin, &table));
    /// assert!(!admins.is_satisfied_by(Role::Moderator, &table));
    /// ```
    pub fn any_role<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Requirement::AnyRole(roles.into_iter().collect())
    }

    /// Require a permission.
    pub fn permission(permission: Permission) -> Self {
        Requirement::Permission(permission)
    }

    /// Check the requirement against a resolved role.
    pub fn is_satisfied_by(&self, role: Role, table: &PermissionTable) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::AnyRole(roles) => roles.contains(&role),
            Requirement::Permission(permission) => table.check(role, *permission),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Authenticated => f.write_str("authenticated"),
            Requirement::AnyRole(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                write!(f, "role in [{}]", names.join(", "))
            }
            Requirement::Permission(permission) => write!(f, "permission '{}'", permission),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_role() {
        let table = PermissionTable::standard();
        let req = Requirement::any_role([Role::Admin, Role::Moderator]);

        assert!(req.is_satisfied_by(Role::Admin, &table));
        assert!(req.is_satisfied_by(Role::Moderator, &table));
        assert!(!req.is_satisfied_by(Role::User, &table));
    }

    #[test]
    fn test_permission_requirement() {
        let table = PermissionTable::standard();
        let delete = Requirement::permission(Permission::Delete);

        assert!(delete.is_satisfied_by(Role::Admin, &table));
        assert!(!delete.is_satisfied_by(Role::Moderator, &table));
        assert!(!delete.is_satisfied_by(Role::User, &table));
    }

    #[test]
    fn test_authenticated_accepts_every_role() {
        let table = PermissionTable::standard();
        for role in Role::all() {
            assert!(Requirement::Authenticated.is_satisfied_by(role, &table));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Requirement::any_role([Role::Moderator, Role::Admin]).to_string(),
            "role in [moderator, admin]"
        );
        assert_eq!(
            Requirement::permission(Permission::Write).to_string(),
            "permission 'write'"
        );
    }

    #[test]
    fn test_empty_role_set_rejects_everyone() {
        let table = PermissionTable::standard();
        let nobody = Requirement::any_role(Vec::<Role>::new());
        for role in Role::all() {
            assert!(!nobody.is_satisfied_by(role, &table));
        }
    }
}
