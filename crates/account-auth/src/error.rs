//! Error types for authentication operations
//!
//! This module defines every failure the account core can report. Each
//! variant maps to exactly one HTTP status and one stable error code.

use thiserror::Error;

use crate::store::StoreError;

/// Authentication and authorization error types.
///
/// Token problems are deliberately collapsed: an expired token, a forged
/// signature and a malformed string all surface as [`AuthError::InvalidToken`]
/// with no further detail.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bearer token failed verification (any cause)
    #[error("Invalid token")]
    InvalidToken,

    /// No usable credentials on the request, or the token subject is unknown
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Authenticated, but the role does not satisfy the requirement
    #[error("Insufficient permissions")]
    Forbidden,

    /// Login failed (unknown email or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email is already registered to another account
    #[error("Email already registered")]
    EmailTaken,

    /// Referenced user does not exist
    #[error("User not found")]
    NotFound,

    /// Request payload failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Rejections (bad token, wrong password, missing record) are expected
    /// traffic and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::ConfigError(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidToken | AuthError::Unauthenticated | AuthError::InvalidCredentials => {
                401
            }
            AuthError::Forbidden => 403,
            AuthError::NotFound => 404,
            AuthError::EmailTaken => 400,
            AuthError::InvalidInput(_) => 422,
            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    ///
    /// An invalid token reports the same code as a missing one.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken | AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::InvalidInput(_) => "INVALID_INPUT",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show a client.
    ///
    /// Server errors keep their detail out of responses, and token failures
    /// read the same as missing credentials.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidToken => AuthError::Unauthenticated.to_string(),
            AuthError::ConfigError(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AuthError::EmailTaken,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Backend(msg) => AuthError::Internal(format!("Credential store: {}", msg)),
        }
    }
}
