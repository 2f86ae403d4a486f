//! Application configuration.
//!
//! # Responsibility
//! - Load optional JSON settings and fill defaults for missing keys.
//! - Validate values before any storage or logging is opened.
//!
//! # Invariants
//! - `AppConfig::default()` is always valid.
//! - List limits are never zero.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "lifeflow.sqlite3";
pub const DEFAULT_DASHBOARD_TASK_LIMIT: u32 = 10;
pub const DEFAULT_DASHBOARD_GOAL_LIMIT: u32 = 5;
pub const DEFAULT_LOCAL_USER_EMAIL: &str = "me@lifeflow.local";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Profile used by the local auth provider on `login()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalUserConfig {
    pub email: String,
    pub display_name: Option<String>,
}

impl Default for LocalUserConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_LOCAL_USER_EMAIL.to_string(),
            display_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub local_user: LocalUserConfig,
    pub dashboard_task_limit: u32,
    pub dashboard_goal_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            local_user: LocalUserConfig::default(),
            dashboard_task_limit: DEFAULT_DASHBOARD_TASK_LIMIT,
            dashboard_goal_limit: DEFAULT_DASHBOARD_GOAL_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("db_path cannot be empty".to_string()));
        }
        if self.dashboard_task_limit == 0 || self.dashboard_goal_limit == 0 {
            return Err(ConfigError::Invalid(
                "dashboard list limits must be >= 1".to_string(),
            ));
        }
        if !self.local_user.email.contains('@') {
            return Err(ConfigError::Invalid(format!(
                "local_user.email must be an email address, got `{}`",
                self.local_user.email
            )));
        }
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be absolute, got `{}`",
                    log_dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DEFAULT_DASHBOARD_TASK_LIMIT};

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = AppConfig::from_json(r#"{ "dashboard_goal_limit": 3 }"#).unwrap();
        assert_eq!(config.dashboard_goal_limit, 3);
        assert_eq!(config.dashboard_task_limit, DEFAULT_DASHBOARD_TASK_LIMIT);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = AppConfig::from_json(r#"{ "dashboard_task_limit": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = AppConfig::from_json(r#"{ "log_dir": "logs" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
