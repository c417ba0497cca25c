use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub revisions: RevisionsConfig,
}

/// How git processes are started
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// git executable name or path
    pub binary: String,
    /// Value forced into `LC_ALL` on Unix so output stays parseable
    pub locale: String,
    /// Pause after each command, in microseconds
    pub settle_delay_micros: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            locale: "en_US.UTF-8".to_string(),
            settle_delay_micros: 800,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub log_commands: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_commands: true,
            log_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RevisionsConfig {
    pub default_limit: i64,
}

impl Default for RevisionsConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("gitfacade"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Err(ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Config file not found",
            )));
        }

        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::ReadError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(ConfigError::DirectoryNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;

        // Validate config
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        // Validate before saving
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)?;

        fs::write(&path, contents)?;

        // Set permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Path of the command history log
    pub fn audit_log_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log.log_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("history.log")),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.git.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "git.binary must not be empty".to_string(),
            ));
        }

        if self.git.locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "git.locale must not be empty".to_string(),
            ));
        }

        if self.revisions.default_limit <= 0 {
            return Err(ConfigError::InvalidValue(
                "revisions.default_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
