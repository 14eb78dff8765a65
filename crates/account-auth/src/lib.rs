//! # Account Authentication
//!
//! This crate is the authentication and authorization core of the account
//! service.
//!
//! ## Overview
//!
//! The account-auth crate handles:
//! - **Tokens**: HS256 bearer tokens with a 30 minute lifetime
//! - **Passwords**: Argon2id hashing and verification
//! - **Credential Store**: user records behind an async trait
//! - **Access Guard**: token → user → role → requirement check
//! - **Accounts**: registration, login and profile updates
//!
//! ## Usage
//!
//! ```rust,no_run
//! use account_auth::{AccessGuard, AccountService, MemoryCredentialStore, TokenService};
//! use account_auth::accounts::{Credentials, Registration};
//! use account_rbac::{Permission, PermissionTable};
//! use std::sync::Arc;
//!
//! # async fn run() -> account_auth::AuthResult<()> {
//! let tokens = Arc::new(TokenService::with_secret("your-secret-key")?);
//! let store = Arc::new(MemoryCredentialStore::new());
//! let accounts = AccountService::new(store.clone(), tokens.clone());
//! let guard = AccessGuard::new(tokens, store, Arc::new(PermissionTable::standard()));
//!
//! accounts
//!     .register(Registration {
//!         name: "Alice".into(),
//!         email: "alice@example.com".into(),
//!         password: "pw123".into(),
//!     })
//!     .await?;
//! let session = accounts
//!     .login(Credentials {
//!         email: "alice@example.com".into(),
//!         password: "pw123".into(),
//!     })
//!     .await?;
//!
//! let principal = guard
//!     .require_permission(Some(&session.access_token), Permission::Read)
//!     .await?;
//! assert_eq!(principal.email(), "alice@example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure semantics
//!
//! Authentication is always checked before authorization. A caller with a
//! missing, forged or expired token gets [`AuthError::Unauthenticated`]
//! regardless of what the protected operation requires.

pub mod accounts;
pub mod claims;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod store;
pub mod user;

// Re-export main types
pub use accounts::{AccountService, LoginSession};
pub use claims::AccessClaims;
pub use error::{AuthError, AuthResult};
pub use guard::{AccessGuard, Principal};
pub use jwt::{TokenConfig, TokenService, DEFAULT_ACCESS_TOKEN_TTL_MINUTES};
pub use password::PasswordHasher;
pub use store::{CredentialStore, MemoryCredentialStore, StoreError, StoreResult};
pub use user::{User, UserId, UserProfile};
