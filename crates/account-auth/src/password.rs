//! Password hashing
//!
//! Argon2id with a random salt per hash. Hashes are PHC strings, so the
//! algorithm, parameters and salt travel with the hash itself.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AuthError, AuthResult};

/// One-way salted password hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a hasher with the default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// Argon2 is CPU-bound and memory-hard, so the work runs on the blocking
    /// thread pool and never stalls the async workers.
    ///
    /// # Returns
    ///
    /// PHC string, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`
    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed hash is treated as a mismatch. Runs on the blocking pool
    /// like [`PasswordHasher::hash`].
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "password verification task failed");
                false
            }
        }
    }
}

fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
