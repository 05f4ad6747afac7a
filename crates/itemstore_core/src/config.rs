//! Process configuration for the item store.
//!
//! # Responsibility
//! - Read backend selection, storage location and logging settings from the
//!   environment.
//! - Reject malformed values before anything touches storage.
//!
//! # Invariants
//! - Exactly one backend is selected per `StoreConfig`.
//! - `log_dir`, when set, is absolute.

use crate::logging::default_log_level;
use std::env;
use std::path::PathBuf;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub const BACKEND_ENV: &str = "ITEMSTORE_BACKEND";
pub const DB_PATH_ENV: &str = "ITEMSTORE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "ITEMSTORE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "ITEMSTORE_LOG_DIR";
pub const SEED_ENV: &str = "ITEMSTORE_SEED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown backend `{0}`; expected memory|sql|named-sql|derived|builder|split")]
    InvalidBackend(String),
    #[error("failed to parse environment variable '{key}': expected true|false, got `{value}`")]
    InvalidBool { key: String, value: String },
    #[error("log directory must be an absolute path, got `{0}`")]
    RelativeLogDir(String),
}

/// Storage strategy used for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Backend {
    /// Mutex-guarded in-process map; nothing touches SQLite.
    #[default]
    Memory,
    /// Positional-bind SQL with concatenated predicates.
    Sql,
    /// Named-bind SQL with a table-driven insert.
    NamedSql,
    /// One fixed finder statement per filter combination.
    Derived,
    /// sea-query expression builder.
    Builder,
    /// CRUD through `Derived`, searches through `Builder`.
    Split,
}

impl Backend {
    /// Returns whether the backend needs a SQLite connection.
    pub fn uses_sqlite(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: Backend,
    /// SQLite file; `None` means a private in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Rolling log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
    /// Whether to store the two startup sample items.
    pub seed_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed_data: false,
        }
    }
}

impl StoreConfig {
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Loads configuration from `ITEMSTORE_*` environment variables.
    ///
    /// Unset or empty variables fall back to [`StoreConfig::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match env_non_empty(BACKEND_ENV) {
            Some(raw) => parse_backend(&raw)?,
            None => defaults.backend,
        };

        let log_dir = match env_non_empty(LOG_DIR_ENV) {
            Some(raw) => {
                let path = PathBuf::from(&raw);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(raw));
                }
                Some(path)
            }
            None => None,
        };

        let seed_data = match env_non_empty(SEED_ENV) {
            Some(raw) => parse_bool(SEED_ENV, &raw)?,
            None => defaults.seed_data,
        };

        Ok(Self {
            backend,
            db_path: env_non_empty(DB_PATH_ENV).map(PathBuf::from),
            log_level: env_or_default(LOG_LEVEL_ENV, &defaults.log_level),
            log_dir,
            seed_data,
        })
    }
}

/// Parses a backend id such as `named-sql` (case-insensitive).
pub fn parse_backend(raw: &str) -> Result<Backend, ConfigError> {
    raw.trim()
        .parse::<Backend>()
        .map_err(|_| ConfigError::InvalidBackend(raw.to_string()))
}

/// Returns the variable's value, or `default` when unset or blank.
pub fn env_or_default(key: &str, default: &str) -> String {
    env_non_empty(key).unwrap_or_else(|| default.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
