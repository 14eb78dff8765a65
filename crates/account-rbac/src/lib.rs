//! # Account RBAC (Role-Based Access Control)
//!
//! This crate provides the authorization vocabulary of the account service.
//!
//! ## Overview
//!
//! The account-rbac crate handles:
//! - **Roles**: Admin, Moderator and User, derived from a user's email
//! - **Permissions**: read, write, delete and admin
//! - **Permission Table**: the static role → permissions mapping
//! - **Requirements**: guard predicates checked in front of handlers
//!
//! ## Architecture
//!
//! ```text
//! email ──resolve──▶ Role ──PermissionTable──▶ {Permission}
//!
//!   Admin      read, write, delete, admin
//!   Moderator  read, write
//!   User       read
//! ```
//!
//! Roles are never stored. They are recomputed from the current email on
//! every check, so changing a user's email can change their role.
//!
//! ## Usage
//!
//! ```
//! use account_rbac::{Permission, PermissionTable, Requirement, Role};
//!
//! let role = Role::resolve("moderator@example.com");
//! assert_eq!(role, Role::Moderator);
//!
//! let table = PermissionTable::standard();
//! assert!(table.check(role, Permission::Write));
//! assert!(!table.check(role, Permission::Delete));
//!
//! let requirement = Requirement::any_role([Role::Admin, Role::Moderator]);
//! assert!(requirement.is_satisfied_by(role, &table));
//! ```

pub mod permissions;
pub mod requirement;
pub mod roles;

// Re-export main types for convenience
pub use permissions::{Permission, PermissionTable};
pub use requirement::Requirement;
pub use roles::Role;
