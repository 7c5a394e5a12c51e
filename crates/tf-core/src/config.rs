//! Configuration types and loading
//!
//! Defaults reproduce the demo deployment; `TASKFLOW_*` environment
//! variables override individual values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Credential and registration policy
    pub auth: AuthConfig,

    /// Session persistence
    pub session: SessionConfig,

    /// Navigation targets used by the route guard
    pub routes: RoutesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Password shared by every seeded identity
    pub shared_password: String,
    /// Reject registrations whose email already belongs to a known identity
    pub enforce_unique_email: bool,
    /// Minimum password length accepted by the registration form
    pub password_min_length: usize,
    /// Minimum display name length accepted by the registration form
    pub name_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            shared_password: "password".to_string(),
            enforce_unique_email: false,
            password_min_length: 8,
            name_min_length: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    #[default]
    Memory,
    File,
}

impl FromStr for SessionBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(ConfigError::InvalidValue {
                key: "TASKFLOW_SESSION_BACKEND".to_string(),
                message: format!("unknown backend '{}', expected 'memory' or 'file'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Name of the persisted identity record
    pub storage_key: String,
    /// Where the record lives
    pub backend: SessionBackend,
    /// Directory for the file backend
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "user".to_string(),
            backend: SessionBackend::Memory,
            storage_path: PathBuf::from(".taskflow"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Where anonymous visitors are sent
    pub login_path: String,
    /// Default view after authentication and on role mismatch
    pub landing_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Read `.env` if present, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Auth
        if let Some(password) = lookup("TASKFLOW_SHARED_PASSWORD") {
            config.auth.shared_password = password;
        }
        if let Some(v) = lookup("TASKFLOW_ENFORCE_UNIQUE_EMAIL") {
            config.auth.enforce_unique_email = parse_bool(&v);
        }
        if let Some(v) = lookup("TASKFLOW_PASSWORD_MIN_LENGTH") {
            config.auth.password_min_length = parse_usize("TASKFLOW_PASSWORD_MIN_LENGTH", &v)?;
        }
        if let Some(v) = lookup("TASKFLOW_NAME_MIN_LENGTH") {
            config.auth.name_min_length = parse_usize("TASKFLOW_NAME_MIN_LENGTH", &v)?;
        }

        // Session
        if let Some(key) = lookup("TASKFLOW_SESSION_KEY") {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "TASKFLOW_SESSION_KEY".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            config.session.storage_key = key;
        }
        if let Some(v) = lookup("TASKFLOW_SESSION_BACKEND") {
            config.session.backend = v.parse()?;
        }
        if let Some(path) = lookup("TASKFLOW_SESSION_PATH") {
            config.session.storage_path = PathBuf::from(path);
        }

        // Routes
        if let Some(path) = lookup("TASKFLOW_LOGIN_PATH") {
            config.routes.login_path = path;
        }
        if let Some(path) = lookup("TASKFLOW_LANDING_PATH") {
            config.routes.landing_path = path;
        }

        Ok(config)
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v.trim(), "true" | "1" | "yes")
}

fn parse_usize(key: &str, v: &str) -> Result<usize, ConfigError> {
    v.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a non-negative integer, got '{}'", v),
    })
}
