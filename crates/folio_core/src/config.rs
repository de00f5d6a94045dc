//! Runtime configuration for store hosts.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//! - Let explicit overrides (CLI flags) win over environment values.
//!
//! # Invariants
//! - Resolution never touches the filesystem; it only computes paths.
//! - Blank environment values are treated as unset.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "FOLIO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "FOLIO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "FOLIO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "folio.sqlite3";

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the store.
    pub db_path: PathBuf,
    /// Normalized level (`trace|debug|info|warn|error`).
    pub log_level: &'static str,
    /// Absolute log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// Explicit values that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves from process environment, then applies `overrides`.
    ///
    /// # Errors
    /// - Returns an error when the effective log level is unsupported.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, String> {
        Self::resolve_with(|key| std::env::var(key).ok(), overrides)
    }

    /// Same as [`CoreConfig::resolve`] with an injectable variable lookup.
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, String> {
        let env = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let db_path = overrides
            .db_path
            .or_else(|| env(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or(defaults.db_path);
        let log_level = match overrides.log_level.or_else(|| env(LOG_LEVEL_ENV)) {
            Some(raw) => normalize_level(&raw)?,
            None => defaults.log_level,
        };
        let log_dir = overrides
            .log_dir
            .or_else(|| env(LOG_DIR_ENV).map(PathBuf::from));

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigOverrides, CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn environment_values_are_used_when_no_override() {
        let config = CoreConfig::resolve_with(
            lookup(&[
                (DB_PATH_ENV, "/data/folio.db"),
                (LOG_LEVEL_ENV, "WARNING"),
                (LOG_DIR_ENV, "/var/log/folio"),
            ]),
            ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/folio.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/folio")));
    }

    #[test]
    fn overrides_win_and_blank_env_is_ignored() {
        let config = CoreConfig::resolve_with(
            lookup(&[(DB_PATH_ENV, "   "), (LOG_LEVEL_ENV, "error")]),
            ConfigOverrides {
                log_level: Some("trace".to_string()),
                ..ConfigOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.db_path, CoreConfig::default().db_path);
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn unsupported_level_is_rejected() {
        let err = CoreConfig::resolve_with(
            lookup(&[(LOG_LEVEL_ENV, "loud")]),
            ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.contains("unsupported log level"));
    }
}
