//! Access guard
//!
//! The guard turns a bearer token into an authenticated [`Principal`] and
//! checks it against a [`Requirement`]. Authentication always runs first:
//! a caller that cannot be identified learns nothing about what the
//! protected operation would have required.

use account_rbac::{Permission, PermissionTable, Requirement, Role};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::jwt::TokenService;
use crate::store::CredentialStore;
use crate::user::User;

/// An authenticated caller and the role resolved for them on this request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub role: Role,
}

impl Principal {
    /// Email the caller authenticated as.
    pub fn email(&self) -> &str {
        &self.user.email
    }
}

/// Authenticates bearer tokens and enforces requirements.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenService>,
    store: Arc<dyn CredentialStore>,
    permissions: Arc<PermissionTable>,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("tokens", &self.tokens)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

impl AccessGuard {
    /// Create a guard over a token service, a credential store and a
    /// permission table.
    pub fn new(
        tokens: Arc<TokenService>,
        store: Arc<dyn CredentialStore>,
        permissions: Arc<PermissionTable>,
    ) -> Self {
        Self {
            tokens,
            store,
            permissions,
        }
    }

    /// The permission table this guard checks against.
    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    /// Identify the caller behind a bearer token.
    ///
    /// A missing token, a token that fails verification and a token whose
    /// subject has no user record all yield [`AuthError::Unauthenticated`].
    pub async fn authenticate(&self, token: Option<&str>) -> AuthResult<Principal> {
        let token = token.ok_or(AuthError::Unauthenticated)?;
        let email = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                tracing::debug!("token subject has no user record");
                AuthError::Unauthenticated
            })?;

        let role = user.role();
        Ok(Principal { user, role })
    }

    /// Authenticate the caller, then check `requirement`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthenticated`] if the caller cannot be identified
    /// - [`AuthError::Forbidden`] if the resolved role does not satisfy the
    ///   requirement
    pub async fn authorize(
        &self,
        token: Option<&str>,
        requirement: &Requirement,
    ) -> AuthResult<Principal> {
        let principal = self.authenticate(token).await?;

        if !requirement.is_satisfied_by(principal.role, &self.permissions) {
            tracing::warn!(
                user_id = principal.user.id,
                role = %principal.role,
                required = %requirement,
                "authorization denied"
            );
            return Err(AuthError::Forbidden);
        }

        tracing::debug!(
            user_id = principal.user.id,
            role = %principal.role,
            required = %requirement,
            "authorization granted"
        );
        Ok(principal)
    }

    /// Succeed iff the caller's role is in `allowed`.
    pub async fn require_role(
        &self,
        token: Option<&str>,
        allowed: impl IntoIterator<Item = Role>,
    ) -> AuthResult<Principal> {
        let allowed: BTreeSet<Role> = allowed.into_iter().collect();
        self.authorize(token, &Requirement::AnyRole(allowed)).await
    }

    /// Succeed iff the permission table grants `permission` to the caller's role.
    pub async fn require_permission(
        &self,
        token: Option<&str>,
        permission: Permission,
    ) -> AuthResult<Principal> {
        self.authorize(token, &Requirement::Permission(permission))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use crate::user::NewUser;
    use chrono::Duration;

    struct Fixture {
        guard: AccessGuard,
        tokens: Arc<TokenService>,
        store: MemoryCredentialStore,
    }

    async fn fixture() -> Fixture {
        let tokens = Arc::new(TokenService::with_secret("guard-test-secret").unwrap());
        let store = MemoryCredentialStore::new();
        for (name, email) in [
            ("Root", "admin@x.com"),
            ("Mo", "moderator@x.com"),
            ("Alice", "alice@x.com"),
        ] {
            store
                .create(NewUser {
                    name: name.into(),
                    email: email.into(),
                    password_hash: "hash".into(),
                })
                .await
                .unwrap();
        }

        let guard = AccessGuard::new(
            tokens.clone(),
            Arc::new(store.clone()),
            Arc::new(PermissionTable::standard()),
        );
        Fixture {
            guard,
            tokens,
            store,
        }
    }

    #[tokio::test]
    async fn test_authenticate_resolves_role() {
        let f = fixture().await;
        let token = f.tokens.issue("moderator@x.com").unwrap();

        let principal = f.guard.authenticate(Some(&token)).await.unwrap();
        assert_eq!(principal.email(), "moderator@x.com");
        assert_eq!(principal.role, Role::Moderator);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let f = fixture().await;
        let result = f.guard.require_permission(None, Permission::Read).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthenticated() {
        let f = fixture().await;
        let token = f.tokens.issue("ghost@x.com").unwrap();

        let result = f.guard.require_permission(Some(&token), Permission::Read).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_token_never_forbidden() {
        let f = fixture().await;
        let expired = f
            .tokens
            .issue_with_ttl("alice@x.com", Duration::minutes(-1))
            .unwrap();

        // Alice would be forbidden from deleting; an expired token must not reveal that.
        for token in [expired.as_str(), "garbage"] {
            let delete = f.guard.require_permission(Some(token), Permission::Delete).await;
            assert!(matches!(delete, Err(AuthError::Unauthenticated)));

            let admin = f.guard.require_role(Some(token), [Role::Admin]).await;
            assert!(matches!(admin, Err(AuthError::Unauthenticated)));
        }
    }

    #[tokio::test]
    async fn test_require_permission() {
        let f = fixture().await;
        let alice = f.tokens.issue("alice@x.com").unwrap();
        let moderator = f.tokens.issue("moderator@x.com").unwrap();
        let admin = f.tokens.issue("admin@x.com").unwrap();

        assert!(f.guard.require_permission(Some(&alice), Permission::Read).await.is_ok());
        assert!(matches!(
            f.guard.require_permission(Some(&alice), Permission::Write).await,
            Err(AuthError::Forbidden)
        ));
        assert!(f.guard.require_permission(Some(&moderator), Permission::Write).await.is_ok());
        assert!(matches!(
            f.guard.require_permission(Some(&moderator), Permission::Delete).await,
            Err(AuthError::Forbidden)
        ));
        assert!(f.guard.require_permission(Some(&admin), Permission::Delete).await.is_ok());
    }

    #[tokio::test]
    async fn test_require_role() {
        let f = fixture().await;
        let moderator = f.tokens.issue("moderator@x.com").unwrap();

        assert!(f
            .guard
            .require_role(Some(&moderator), [Role::Admin, Role::Moderator])
            .await
            .is_ok());
        assert!(matches!(
            f.guard.require_role(Some(&moderator), [Role::Admin]).await,
            Err(AuthError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_role_recomputed_after_email_change() {
        let f = fixture().await;
        let alice = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        f.store
            .update(
                alice.id,
                crate::user::UserChanges {
                    email: Some("alice.admin@x.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The old token names an email that no longer exists
        let old = f.tokens.issue("alice@x.com").unwrap();
        assert!(matches!(
            f.guard.authenticate(Some(&old)).await,
            Err(AuthError::Unauthenticated)
        ));

        let new = f.tokens.issue("alice.admin@x.com").unwrap();
        let principal = f.guard.require_role(Some(&new), [Role::Admin]).await.unwrap();
        assert_eq!(principal.user.id, alice.id);
    }

    #[tokio::test]
    async fn test_deleted_user_token_is_unauthenticated() {
        let f = fixture().await;
        let token = f.tokens.issue("alice@x.com").unwrap();
        let alice = f.store.find_by_email("alice@x.com").await.unwrap().unwrap();
        f.store.delete(alice.id).await.unwrap();

        assert!(matches!(
            f.guard.authenticate(Some(&token)).await,
            Err(AuthError::Unauthenticated)
        ));
    }
}
