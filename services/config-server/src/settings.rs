//! Server settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CONFIG_SERVER__SECTION__KEY` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Env var naming an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_SERVER_CONFIG";
/// Settings file looked up when no explicit path is given (any supported extension).
pub const DEFAULT_CONFIG_BASENAME: &str = "config/config-server";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret; a random one is generated when unset.
    pub jwt_secret: Option<String>,
    pub issuer: String,
    pub token_ttl_secs: u64,
    #[serde(default)]
    pub users: Vec<UserAccount>,
    /// Password for the `admin` account created when `users` is empty.
    pub bootstrap_password: Option<String>,
    pub login_attempts_per_minute: u32,
}

#[derive(Clone, Deserialize)]
pub struct UserAccount {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Postgres URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

impl Settings {
    /// Load settings, honouring `CONFIG_SERVER_CONFIG` for the file location.
    pub fn load() -> Result<Self, SettingsError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Load settings from an explicit file (required) or the default
    /// location (optional), with environment overrides on top.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_CONFIG_BASENAME).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("auth.issuer", "config-server")?
            .set_default("auth.token_ttl_secs", 3600_i64)?
            .set_default("auth.login_attempts_per_minute", 10_i64)?
            .set_default("storage.max_connections", 5_i64)?
            .set_default("log.level", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix("CONFIG_SERVER").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.auth.token_ttl_secs == 0 {
            return Err(SettingsError::Invalid(
                "auth.token_ttl_secs must be positive".to_string(),
            ));
        }
        if self.auth.login_attempts_per_minute == 0 {
            return Err(SettingsError::Invalid(
                "auth.login_attempts_per_minute must be positive".to_string(),
            ));
        }
        if matches!(&self.auth.jwt_secret, Some(secret) if secret.is_empty()) {
            return Err(SettingsError::Invalid("auth.jwt_secret is empty".to_string()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
