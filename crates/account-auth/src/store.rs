//! Credential store
//!
//! The store owns user records and enforces email uniqueness. The core only
//! talks to it through [`CredentialStore`]; [`MemoryCredentialStore`] is the
//! in-process implementation used by the server and by tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::user::{NewUser, User, UserChanges, UserId};

/// Credential store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Email already belongs to another record
    #[error("Email already registered")]
    Conflict,

    /// No record with the given id
    #[error("User not found")]
    NotFound,

    /// Backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for user records keyed by numeric id.
///
/// Each method is a single atomic operation. Email comparisons are exact;
/// callers pass normalized emails.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user and return it with its assigned id.
    ///
    /// Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Get a user by id.
    async fn get(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// List all users ordered by id.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Apply changes to a user and return the updated record.
    ///
    /// Fails with [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Conflict`] if the new email belongs to someone else.
    async fn update(&self, id: UserId, changes: UserChanges) -> StoreResult<User>;

    /// Remove a user.
    async fn delete(&self, id: UserId) -> StoreResult<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: UserId,
    users: BTreeMap<UserId, User>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory credential store.
///
/// Uniqueness checks and writes happen under one write lock, so two
/// concurrent registrations of the same email cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCredentialStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.email_taken(&user.email, None) {
            return Err(StoreError::Conflict);
        }

        state.next_id += 1;
        let record = User {
            id: state.next_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict);
            }
        }

        let user = state.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> StoreResult<()> {
        self.state
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
