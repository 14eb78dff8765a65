//! JWT claims for account bearer tokens

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token.
///
/// Only `sub` and `exp` take part in validation. `iat` and `jti` are kept so
/// an individual token can be traced in logs.
///
/// # Example
///
/// ```rust
/// use account_auth::claims::AccessClaims;
///
/// let claims = AccessClaims::new("user@example.com", chrono::Duration::minutes(30));
/// assert_eq!(claims.sub, "user@example.com");
/// assert!(!claims.is_expired());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (the user's email)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,

    /// JWT ID (unique identifier for this token)
    #[serde(default)]
    pub jti: String,
}

impl AccessClaims {
    /// Create claims for `subject` that expire `ttl` from now.
    ///
    /// A zero or negative `ttl` produces claims that are already expired.
    pub fn new(subject: impl Into<String>, ttl: chrono::Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Check if the token is expired.
    ///
    /// A token is valid only while `exp` is strictly in the future.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
