//! Shared application state.

use account_auth::{
    AccessGuard, AccountService, AuthResult, CredentialStore, MemoryCredentialStore, TokenConfig,
    TokenService,
};
use account_rbac::PermissionTable;
use std::sync::Arc;

/// State handed to every handler. Cloning is cheap; all parts are shared.
#[derive(Debug, Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub guard: AccessGuard,
}

impl AppState {
    /// Build state over a fresh in-memory credential store.
    pub fn new(token_config: TokenConfig) -> AuthResult<Self> {
        Self::with_store(token_config, Arc::new(MemoryCredentialStore::new()))
    }

    /// Build state over an existing credential store.
    pub fn with_store(
        token_config: TokenConfig,
        store: Arc<dyn CredentialStore>,
    ) -> AuthResult<Self> {
        let tokens = Arc::new(TokenService::new(token_config)?);
        let permissions = Arc::new(PermissionTable::standard());

        Ok(Self {
            accounts: AccountService::new(store.clone(), tokens.clone()),
            guard: AccessGuard::new(tokens, store, permissions),
        })
    }
}
