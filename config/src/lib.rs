//! # Configuration Management for AtomStore
//!
//! This crate provides centralized configuration structures for AtomStore,
//! covering the SQLite database settings used by the transaction backend.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::DatabaseConfig;
//!
//! let db_config = DatabaseConfig::with_path("./app.db");
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! path = "./app.db"
//! create_if_missing = true
//! busy_timeout_seconds = 5
//! journal_mode = "wal"
//! foreign_keys = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from atomstore.toml, or the path named by ATOMSTORE_CONFIG
//! let config = AppConfig::load().unwrap();
//!
//! // Or load from a custom path
//! let config = AppConfig::from_file("config/production.toml").unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./atomstore.toml";

const JOURNAL_MODES: &[&str] = &["delete", "truncate", "persist", "memory", "wal", "off"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

/// Database configuration for a file-backed SQLite database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
    #[serde(default = "default_busy_timeout_seconds")]
    pub busy_timeout_seconds: u64,
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
}

fn default_create_if_missing() -> bool {
    true
}

fn default_busy_timeout_seconds() -> u64 {
    5
}

fn default_journal_mode() -> String {
    "wal".to_string()
}

fn default_foreign_keys() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the TOML file named in the environment or
    /// from the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variables may be set directly.
        dotenvy::dotenv().ok();

        let config = if let Ok(config_path) = env::var("ATOMSTORE_CONFIG") {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified as ATOMSTORE_CONFIG or in {} file",
                DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(
        path: String,
        create_if_missing: bool,
        busy_timeout_seconds: u64,
        journal_mode: String,
        foreign_keys: bool,
    ) -> Self {
        Self {
            path,
            create_if_missing,
            busy_timeout_seconds,
            journal_mode,
            foreign_keys,
        }
    }

    /// Configuration for the database file at `path` with default settings
    pub fn with_path(path: &str) -> Self {
        Self {
            path: path.to_string(),
            create_if_missing: default_create_if_missing(),
            busy_timeout_seconds: default_busy_timeout_seconds(),
            journal_mode: default_journal_mode(),
            foreign_keys: default_foreign_keys(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Invalid(
                "Database path cannot be empty".to_string(),
            ));
        }
        if !JOURNAL_MODES.contains(&self.journal_mode.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown journal_mode '{}', expected one of {}",
                self.journal_mode,
                JOURNAL_MODES.join(", ")
            )));
        }
        Ok(())
    }
}
