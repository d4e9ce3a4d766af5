//! Configuration management for windsp-editor
//!
//! This crate holds the server settings (loaded from an optional YAML file)
//! and the locator for the single WinDSP configuration document the server
//! exposes.

pub mod error;
pub mod locator;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigResult};
pub use locator::{ConfigLocation, ConfigLocator, DEFAULT_FILE_NAME, OVERRIDE_PARAMETER};

// ==================== Settings Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow cross-origin requests from the editor
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

/// Configuration document settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentConfig {
    /// Path to the WinDSP JSON file; `--conf` wins over this
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// How saves replace the file
    #[serde(default)]
    pub write_mode: WriteMode,
}

/// How a save replaces the document on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Truncate the file in place and write the new content
    #[default]
    Truncate,
    /// Write a sibling temporary file, then rename it over the document
    Atomic,
}

impl std::str::FromStr for WriteMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "truncate" => Ok(WriteMode::Truncate),
            "atomic" => Ok(WriteMode::Atomic),
            _ => Err(format!("Invalid write mode: {}", s)),
        }
    }
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteMode::Truncate => write!(f, "truncate"),
            WriteMode::Atomic => write!(f, "atomic"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                    parameter: "--settings".to_string(),
                }
            } else {
                ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                }
            }
        })?;

        let settings = Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::InvalidYaml { reason, .. } => ConfigError::InvalidYaml {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        Ok(settings)
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let settings: Settings =
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".to_string(),
                reason: "Host must not be empty".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default settings file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_settings.yaml")
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the document locator, preferring `cli_override` over the settings path
    pub fn locator(&self, cli_override: Option<PathBuf>) -> ConfigLocator {
        ConfigLocator::new(cli_override.or_else(|| self.document.path.clone()))
    }
}
