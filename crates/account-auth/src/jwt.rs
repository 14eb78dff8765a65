//! Bearer token issuance and verification
//!
//! Tokens are HS256 JWTs signed with a single process-wide secret. They are
//! stateless: a token is valid exactly when its signature checks out and its
//! `exp` lies in the future. There is no revocation list.

use crate::claims::AccessClaims;
use crate::error::{AuthError, AuthResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use std::fmt;

/// Default lifetime of an access token.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Token configuration, loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,

    /// Access token duration
    pub access_token_ttl: Duration,
}

impl TokenConfig {
    /// Configuration with the given secret and the default 30 minute lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
        }
    }

    /// Configuration with a freshly generated 256-bit secret.
    ///
    /// Tokens signed with a generated secret stop verifying once the process
    /// exits.
    pub fn generated() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(STANDARD.encode(bytes))
    }

    /// Override the access token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

/// Issues and verifies access tokens.
pub struct TokenService {
    access_token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    /// Create a token service from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ConfigError`] if the secret is empty or the
    /// lifetime is not positive.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::ConfigError(
                "Token signing secret must not be empty".to_string(),
            ));
        }
        if config.access_token_ttl <= Duration::zero() {
            return Err(AuthError::ConfigError(
                "Access token lifetime must be positive".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            access_token_ttl: config.access_token_ttl,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }

    /// Create with a simple secret and the default lifetime.
    pub fn with_secret(secret: impl Into<String>) -> AuthResult<Self> {
        Self::new(TokenConfig::new(secret))
    }

    /// Lifetime of tokens produced by [`TokenService::issue`].
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Issue an access token for `subject` with the configured lifetime.
    pub fn issue(&self, subject: &str) -> AuthResult<String> {
        self.issue_with_ttl(subject, self.access_token_ttl)
    }

    /// Issue an access token that expires `ttl` from now.
    ///
    /// A zero or negative `ttl` yields a token that never verifies.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> AuthResult<String> {
        let claims = AccessClaims::new(subject, ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validate a token and return its claims.
    ///
    /// Every failure (malformed, bad signature, wrong algorithm, missing
    /// claim, expired) is reported as [`AuthError::InvalidToken`]. The
    /// underlying cause is only logged at debug level.
    pub fn validate_token(&self, token: &str) -> AuthResult<AccessClaims> {
        let claims = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "rejected bearer token");
                AuthError::InvalidToken
            })?
            .claims;

        // jsonwebtoken accepts exp == now; a token must expire strictly after now.
        if claims.is_expired() {
            tracing::debug!(jti = %claims.jti, "rejected bearer token: expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        self.validate_token(token).map(|claims| claims.sub)
    }
}
