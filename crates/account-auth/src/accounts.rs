//! Registration, login and profile updates
//!
//! Thin orchestration over the credential store, the password hasher and the
//! token service. Emails are normalized before they reach the store, so
//! "Alice@X.com" and "alice@x.com" are the same account.

use account_rbac::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};
use crate::jwt::TokenService;
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use crate::user::{
    normalize_email, require_non_empty, validate_email, NewUser, UserChanges, UserId, UserProfile,
};

/// Verified against when a login names an unknown email, so both failure
/// paths do the same amount of hashing work.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$4Gv9ZOKcXq1BcEZc0ZAkw1mQ0w9xq0q1i8c0Wn0cY2Q";

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Profile update payload. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    /// Signed bearer token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: &'static str,

    /// Seconds until the token expires
    pub expires_in: i64,

    /// The authenticated user
    pub user: UserProfile,

    /// Role resolved at login, for client convenience only
    pub role: Role,
}

/// Account lifecycle operations.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            tokens,
            hasher: PasswordHasher::new(),
        }
    }

    /// Register a new account and return its id.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] for an empty name or password or a
    ///   malformed email
    /// - [`AuthError::EmailTaken`] if the email is already registered;
    ///   nothing is written in that case
    pub async fn register(&self, registration: Registration) -> AuthResult<UserId> {
        let email = normalize_email(&registration.email);
        require_non_empty("name", &registration.name)?;
        require_non_empty("password", &registration.password)?;
        validate_email(&email)?;

        let password_hash = self.hasher.hash(&registration.password).await?;
        let user = self
            .store
            .create(NewUser {
                name: registration.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role(), "registered user");
        Ok(user.id)
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, credentials: Credentials) -> AuthResult<LoginSession> {
        let email = normalize_email(&credentials.email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                self.hasher
                    .verify(&credentials.password, DUMMY_PASSWORD_HASH)
                    .await;
                tracing::info!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify(&credentials.password, &user.password_hash)
            .await
        {
            tracing::info!(user_id = user.id, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user.email)?;
        let role = user.role();
        tracing::info!(user_id = user.id, role = %role, "login succeeded");

        Ok(LoginSession {
            access_token,
            token_type: "bearer",
            expires_in: self.tokens.access_token_ttl().num_seconds(),
            user: user.profile(),
            role,
        })
    }

    /// List all users ordered by id.
    pub async fn list(&self) -> AuthResult<Vec<UserProfile>> {
        let users = self.store.list().await?;
        Ok(users.iter().map(|u| u.profile()).collect())
    }

    /// Get one user.
    pub async fn get(&self, id: UserId) -> AuthResult<UserProfile> {
        self.store
            .get(id)
            .await?
            .map(|u| u.profile())
            .ok_or(AuthError::NotFound)
    }

    /// Replace the given fields of a user.
    ///
    /// A new password is hashed before it is stored. An email owned by a
    /// different user is [`AuthError::EmailTaken`].
    pub async fn update(&self, id: UserId, update: ProfileUpdate) -> AuthResult<UserProfile> {
        let mut changes = UserChanges::default();

        if let Some(name) = update.name {
            require_non_empty("name", &name)?;
            changes.name = Some(name.trim().to_string());
        }
        if let Some(email) = update.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            changes.email = Some(email);
        }
        if let Some(password) = update.password {
            require_non_empty("password", &password)?;
            changes.password_hash = Some(self.hasher.hash(&password).await?);
        }

        let user = self.store.update(id, changes).await?;
        tracing::info!(user_id = user.id, role = %user.role(), "updated user");
        Ok(user.profile())
    }

    /// Remove a user.
    pub async fn delete(&self, id: UserId) -> AuthResult<()> {
        self.store.delete(id).await?;
        tracing::info!(user_id = id, "deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(TokenService::with_secret("accounts-test-secret").unwrap()),
        )
    }

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let accounts = service();
        let id = accounts
            .register(registration("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let session = accounts.login(credentials("alice@x.com", "pw123")).await.unwrap();
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.role, Role::User);
        assert_eq!(session.user.id, 1);
        assert_eq!(session.expires_in, 30 * 60);
        assert_eq!(accounts.tokens.verify(&session.access_token).unwrap(), "alice@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_record() {
        let accounts = service();
        accounts
            .register(registration("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let second = accounts
            .register(registration("Mallory", "ALICE@x.com", "other"))
            .await;
        assert!(matches!(second, Err(AuthError::EmailTaken)));

        let alice = accounts.get(1).await.unwrap();
        assert_eq!(alice.name, "Alice");
        assert!(accounts.login(credentials("alice@x.com", "pw123")).await.is_ok());
        assert!(accounts.login(credentials("alice@x.com", "other")).await.is_err());
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive() {
        let accounts = service();
        accounts
            .register(registration("Alice", "Alice@X.com", "pw123"))
            .await
            .unwrap();

        let session = accounts.login(credentials("alice@x.COM", "pw123")).await.unwrap();
        assert_eq!(session.user.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_generic() {
        let accounts = service();
        accounts
            .register(registration("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let wrong_password = accounts.login(credentials("alice@x.com", "nope")).await;
        let unknown_email = accounts.login(credentials("bob@x.com", "pw123")).await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_reports_derived_role() {
        let accounts = service();
        accounts
            .register(registration("Root", "admin@x.com", "pw"))
            .await
            .unwrap();
        accounts
            .register(registration("Modern", "modern@x.com", "pw"))
            .await
            .unwrap();

        let admin = accounts.login(credentials("admin@x.com", "pw")).await.unwrap();
        let modern = accounts.login(credentials("modern@x.com", "pw")).await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(modern.role, Role::Moderator);
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let accounts = service();

        for reg in [
            registration("", "alice@x.com", "pw"),
            registration("Alice", "not-an-email", "pw"),
            registration("Alice", "alice@x.com", ""),
        ] {
            assert!(matches!(
                accounts.register(reg).await,
                Err(AuthError::InvalidInput(_))
            ));
        }
        assert!(accounts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rehashes_password_and_changes_email() {
        let accounts = service();
        let id = accounts
            .register(registration("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let profile = accounts
            .update(
                id,
                ProfileUpdate {
                    email: Some("Alice.Mod@x.com".into()),
                    password: Some("new-pw".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.email, "alice.mod@x.com");
        assert_eq!(profile.name, "Alice");

        assert!(accounts.login(credentials("alice.mod@x.com", "pw123")).await.is_err());
        let session = accounts
            .login(credentials("alice.mod@x.com", "new-pw"))
            .await
            .unwrap();
        assert_eq!(session.role, Role::Moderator);
    }

    #[tokio::test]
    async fn test_update_conflict_and_missing() {
        let accounts = service();
        let alice = accounts
            .register(registration("Alice", "alice@x.com", "pw"))
            .await
            .unwrap();
        accounts
            .register(registration("Bob", "bob@x.com", "pw"))
            .await
            .unwrap();

        let taken = accounts
            .update(
                alice,
                ProfileUpdate {
                    email: Some("BOB@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(AuthError::EmailTaken)));

        let missing = accounts.update(99, ProfileUpdate::default()).await;
        assert!(matches!(missing, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete() {
        let accounts = service();
        let id = accounts
            .register(registration("Alice", "alice@x.com", "pw"))
            .await
            .unwrap();

        accounts.delete(id).await.unwrap();
        assert!(matches!(accounts.get(id).await, Err(AuthError::NotFound)));
        assert!(matches!(accounts.delete(id).await, Err(AuthError::NotFound)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_login_leaves_runtime_responsive() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let accounts = service();
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
        };

        accounts
            .register(registration("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();
        let before_login = ticks.load(Ordering::Relaxed);
        accounts.login(credentials("alice@x.com", "pw123")).await.unwrap();
        accounts.login(credentials("nobody@x.com", "pw123")).await.unwrap_err();
        ticker.abort();

        assert!(before_login > 0);
        assert!(ticks.load(Ordering::Relaxed) > before_login);
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        assert!(argon2::PasswordHash::new(DUMMY_PASSWORD_HASH).is_ok());
    }
}
