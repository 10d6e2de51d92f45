//! # Session Configuration
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Environment variables (highest priority)                           │
//! │     CYBER_STARTING_CREDITS, CYBER_IDENTITY_DOMAIN,                     │
//! │     CYBER_MIN_PASSWORD_LEN, CYBER_DB_PATH                              │
//! │                                                                         │
//! │  2. Config file (market.toml)                                          │
//! │     Linux:   ~/.config/cyber-market/market.toml                        │
//! │     macOS:   ~/Library/Application Support/net.cybermarket.cyber-market│
//! │     Windows: %APPDATA%\cybermarket\cyber-market\config\market.toml     │
//! │                                                                         │
//! │  3. Default values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! starting_credits = 50000
//! identity_domain = "cybermarket.net"
//! min_password_len = 6
//! database_path = "/var/lib/cyber-market/market.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use cyber_core::{
    Credits, DEFAULT_IDENTITY_DOMAIN, DEFAULT_MIN_PASSWORD_LEN, DEFAULT_STARTING_CREDITS,
};

const CONFIG_FILE: &str = "market.toml";
const DATABASE_FILE: &str = "cyber-market.db";

/// Longest password the credential rules accept.
const MAX_PASSWORD_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Balance of a fresh identity and of the anonymous guest.
    #[serde(default = "default_starting_credits")]
    pub starting_credits: u64,

    /// Domain used to turn a username into a provider handle.
    #[serde(default = "default_identity_domain")]
    pub identity_domain: String,

    /// Shortest password accepted at signup.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,

    /// SQLite file. `None` resolves to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

fn default_starting_credits() -> u64 {
    DEFAULT_STARTING_CREDITS
}

fn default_identity_domain() -> String {
    DEFAULT_IDENTITY_DOMAIN.to_string()
}

fn default_min_password_len() -> usize {
    DEFAULT_MIN_PASSWORD_LEN
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            starting_credits: default_starting_credits(),
            identity_domain: default_identity_domain(),
            min_password_len: default_min_password_len(),
            database_path: None,
        }
    }
}

impl SessionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or market.toml in the config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading market config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Market config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let domain = self.identity_domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::Invalid("identity_domain must not be empty".into()));
        }
        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "identity_domain must be a bare domain, got: '{}'",
                self.identity_domain
            )));
        }

        if self.min_password_len == 0 || self.min_password_len > MAX_PASSWORD_LEN {
            return Err(ConfigError::Invalid(format!(
                "min_password_len must be between 1 and {}",
                MAX_PASSWORD_LEN
            )));
        }

        if i64::try_from(self.starting_credits).is_err() {
            return Err(ConfigError::Invalid(
                "starting_credits exceeds the storable range".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `CYBER_*` overrides from any key lookup.
    ///
    /// Unparseable numeric values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("CYBER_STARTING_CREDITS") {
            match value.parse::<u64>() {
                Ok(credits) => {
                    debug!(credits, "Overriding starting credits from environment");
                    self.starting_credits = credits;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid CYBER_STARTING_CREDITS"),
            }
        }

        if let Some(domain) = lookup("CYBER_IDENTITY_DOMAIN") {
            debug!(domain = %domain, "Overriding identity domain from environment");
            self.identity_domain = domain;
        }

        if let Some(value) = lookup("CYBER_MIN_PASSWORD_LEN") {
            match value.parse::<usize>() {
                Ok(len) => self.min_password_len = len,
                Err(_) => warn!(value = %value, "Ignoring invalid CYBER_MIN_PASSWORD_LEN"),
            }
        }

        if let Some(path) = lookup("CYBER_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("net", "cybermarket", "cyber-market")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn starting_credits(&self) -> Credits {
        Credits::from_units(self.starting_credits)
    }

    /// Resolved database file.
    ///
    /// Falls back to the working directory when no platform data
    /// directory exists.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }
}
