//! Runtime configuration resolved from environment variables.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Resolution never touches the process environment when a custom lookup
//!   is supplied.

use crate::logging::default_log_level;
use crate::repo::record_repo::DEFAULT_COLLECTION;
use crate::view::pagination::DEFAULT_PAGE_SIZE;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ROSTER_DB_PATH";
pub const ENV_COLLECTION: &str = "ROSTER_COLLECTION";
pub const ENV_PAGE_SIZE: &str = "ROSTER_PAGE_SIZE";
pub const ENV_LOG_LEVEL: &str = "ROSTER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ROSTER_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "roster.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPageSize(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageSize(value) => write!(
                f,
                "{ENV_PAGE_SIZE} must be a positive integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// SQLite document store file.
    pub db_path: PathBuf,
    /// Store collection holding user records.
    pub collection: String,
    pub page_size: usize,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            collection: DEFAULT_COLLECTION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl RosterConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let page_size = match value(ENV_PAGE_SIZE) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPageSize(raw)),
            },
            None => defaults.page_size,
        };

        Ok(Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            collection: value(ENV_COLLECTION).unwrap_or(defaults.collection),
            page_size,
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RosterConfig, ENV_COLLECTION, ENV_LOG_DIR, ENV_PAGE_SIZE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = RosterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.collection, "users");
        assert_eq!(config.page_size, 5);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            RosterConfig::from_lookup(lookup(&[(ENV_COLLECTION, "  "), (ENV_LOG_DIR, "")]))
                .unwrap();
        assert_eq!(config.collection, "users");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = RosterConfig::from_lookup(lookup(&[
            (ENV_COLLECTION, " members "),
            (ENV_PAGE_SIZE, "10"),
            (ENV_LOG_DIR, "/var/log/roster"),
        ]))
        .unwrap();
        assert_eq!(config.collection, "members");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/roster")));
    }

    #[test]
    fn zero_or_garbage_page_size_is_rejected() {
        for raw in ["0", "five", "-1"] {
            let err = RosterConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, raw)])).unwrap_err();
            assert_eq!(err, ConfigError::InvalidPageSize(raw.to_string()));
        }
    }
}
