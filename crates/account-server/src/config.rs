//! Server configuration
//!
//! Defaults, then an optional `config/accounts.toml`, then environment
//! variables prefixed with `ACCOUNTS` (`__` separates nesting levels, e.g.
//! `ACCOUNTS__SERVER__PORT=9000`, `ACCOUNTS__AUTH__JWT_SECRET=...`).

use account_auth::{TokenConfig, DEFAULT_ACCESS_TOKEN_TTL_MINUTES};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/accounts";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub auth: AuthConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Host address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

/// Token settings.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret. Generated at startup when absent.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Access token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

impl ServerConfig {
    /// Load from the default file location and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from `path` (extension optional, file optional) and the environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("ACCOUNTS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("auth.token_ttl_minutes", DEFAULT_ACCESS_TOKEN_TTL_MINUTES)
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns `AddrParseError` if `host:port` is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Token configuration for the token service.
    ///
    /// Without a configured secret a random one is generated; tokens issued
    /// with it stop verifying after a restart.
    pub fn token_config(&self) -> TokenConfig {
        let config = match self.auth.jwt_secret.as_deref() {
            Some(secret) => TokenConfig::new(secret),
            None => {
                tracing::warn!(
                    "ACCOUNTS__AUTH__JWT_SECRET not set, using a generated secret (tokens will not survive a restart)"
                );
                TokenConfig::generated()
            }
        };
        config.with_ttl(chrono::Duration::minutes(self.auth.token_ttl_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> ServerConfig {
        ServerConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_file_overrides() {
        let config = from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9100

            [auth]
            jwt_secret = "from-file"
            "#,
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);

        let tokens = config.token_config();
        assert_eq!(tokens.secret, "from-file");
        assert_eq!(tokens.access_token_ttl.num_minutes(), 30);
    }

    #[test]
    fn test_missing_secret_is_generated() {
        let config = from_toml("");
        let a = config.token_config();
        let b = config.token_config();

        assert!(!a.secret.is_empty());
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = from_toml("[auth]\njwt_secret = \"super-secret-value\"");
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }

    #[test]
    fn test_invalid_host() {
        let config = from_toml("[server]\nhost = \"not a host\"");
        assert!(config.socket_addr().is_err());
    }
}
