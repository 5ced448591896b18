//! Configuration loading
//!
//! A TOML file (by default `<config_dir>/workorder-cli/config.toml`) provides
//! the database location and import defaults. Environment variables override
//! the file; command-line flags override both.

pub mod repository;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::import::types::DuplicateStrategy;

const APP_DIR: &str = "workorder-cli";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "workorders.db";

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "WORKORDER_DATABASE";
/// Environment variable overriding the commit worker count
pub const ENV_WORKERS: &str = "WORKORDER_IMPORT_WORKERS";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub database: Option<PathBuf>,
    #[serde(default)]
    pub import: ImportConfig,
}

/// `[import]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Commit worker-pool size
    pub workers: Option<usize>,
    /// Strategy applied when duplicates exist and nobody is asked
    pub strategy: Option<DuplicateStrategy>,
    /// Extra header aliases keyed by field (`identifier`, `price`, ...)
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration and apply environment overrides.
    ///
    /// An explicit path must exist. Without one, the default file is read
    /// when present and built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => {
                    log::debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            log::debug!("{} overrides database path", ENV_DATABASE);
            self.database = Some(PathBuf::from(database));
        }

        if let Some(workers) = lookup(ENV_WORKERS).filter(|v| !v.trim().is_empty()) {
            let workers = workers
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a positive integer, got '{}'", ENV_WORKERS, workers))?;
            self.import.workers = Some(workers);
        }

        Ok(())
    }

    /// Database path: configured or `<data_dir>/workorder-cli/workorders.db`
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join(DATABASE_FILE))
                .context("Could not determine data directory; set 'database' in the config file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml(
            r#"
            database = "/tmp/orders.db"

            [import]
            workers = 4
            strategy = "replace-duplicates"

            [import.aliases]
            identifier = ["folio interno"]
            price = ["total neto", "neto"]
            "#,
        )
        .unwrap();

        assert_eq!(config.database, Some(PathBuf::from("/tmp/orders.db")));
        assert_eq!(config.import.workers, Some(4));
        assert_eq!(config.import.strategy, Some(DuplicateStrategy::ReplaceDuplicates));
        assert_eq!(config.import.aliases["price"].len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.database.is_none());
        assert!(config.import.workers.is_none());
        assert!(config.import.aliases.is_empty());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Config::from_toml("[import]\nstrategy = \"merge\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_toml("[import]\nworkers = 2").unwrap();
        config
            .apply_env(|key| match key {
                ENV_DATABASE => Some("/data/wo.db".to_string()),
                ENV_WORKERS => Some(" 8 ".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.database_path().unwrap(), PathBuf::from("/data/wo.db"));
        assert_eq!(config.import.workers, Some(8));
    }

    #[test]
    fn test_invalid_worker_env_is_error() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == ENV_WORKERS).then(|| "many".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/workorder.toml"))).is_err());
    }
}
