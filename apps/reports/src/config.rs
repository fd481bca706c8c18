//! # Reports Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DOWNTOWN_DB_PATH=/srv/downtown/downtown.db                         │
//! │     DOWNTOWN_TOP_CUSTOMERS=10                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/downtown/reports.toml (Linux)                            │
//! │     ~/Library/Application Support/com.downtown.backoffice/reports.toml │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # reports.toml
//! [database]
//! path = "/srv/downtown/downtown.db"
//! max_connections = 5
//!
//! [reports]
//! top_customers = 5
//! pretty = true
//!
//! [logging]
//! filter = "info,downtown=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use downtown_db::DbConfig;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "reports.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "downtown", "backoffice")
        .map(|dirs| dirs.data_dir().join("downtown.db"))
        .unwrap_or_else(|| PathBuf::from("downtown.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `[reports]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// How many customers the top-customers ranking keeps.
    #[serde(default = "default_top_customers")]
    pub top_customers: usize,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_top_customers() -> usize {
    downtown_core::DEFAULT_TOP_CUSTOMERS
}

fn default_true() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_customers: default_top_customers(),
            pretty: true,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` still wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,downtown=debug,sqlx=warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete reports configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub reports: ReportSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ReportsConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`reports.toml`); an explicit path must exist
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading reports config from file");
                config = Self::from_file(&path)?;
            } else if explicit {
                return Err(ConfigError::Read {
                    path,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `DOWNTOWN_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DOWNTOWN_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("DOWNTOWN_DB_MAX_CONNECTIONS") {
            self.database.max_connections = max
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DOWNTOWN_DB_MAX_CONNECTIONS".into()))?;
        }

        if let Some(n) = lookup("DOWNTOWN_TOP_CUSTOMERS") {
            self.reports.top_customers = n
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DOWNTOWN_TOP_CUSTOMERS".into()))?;
        }

        if let Some(filter) = lookup("DOWNTOWN_LOG") {
            if filter.trim().is_empty() {
                warn!("Ignoring empty DOWNTOWN_LOG");
            } else {
                self.logging.filter = filter;
            }
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database.path".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        if self.reports.top_customers == 0 {
            return Err(ConfigError::InvalidValue(
                "reports.top_customers must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Storage configuration derived from the `[database]` section.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "downtown", "backoffice")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ReportsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reports.top_customers, 5);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ReportsConfig = toml::from_str(
            r#"
            [database]
            path = "/srv/downtown/downtown.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/srv/downtown/downtown.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.reports.top_customers, 5);
        assert!(config.reports.pretty);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: ReportsConfig = toml::from_str(
            r#"
            [reports]
            top_customers = 3
            "#,
        )
        .unwrap();

        config
            .apply_overrides(env(&[
                ("DOWNTOWN_TOP_CUSTOMERS", "8"),
                ("DOWNTOWN_DB_PATH", "/tmp/override.db"),
            ]))
            .unwrap();

        assert_eq!(config.reports.top_customers, 8);
        assert_eq!(config.database.path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = ReportsConfig::default();
        let err = config
            .apply_overrides(env(&[("DOWNTOWN_DB_MAX_CONNECTIONS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_customers() {
        let mut config = ReportsConfig::default();
        config.reports.top_customers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("downtown-reports-does-not-exist.toml");
        let err = ReportsConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!(
            "downtown-reports-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[reports]\npretty = false\n").unwrap();

        let config = ReportsConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!config.reports.pretty);
    }
}
