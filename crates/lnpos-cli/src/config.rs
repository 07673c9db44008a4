//! Configuration file management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use lnpos_core::{DEFAULT_MOUNT, Wallet};

/// Default backend base URL.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scratch file shared with the display view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_path: Option<PathBuf>,

    /// Backend settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Wallet the registry is managed for
    #[serde(default)]
    pub wallet: Wallet,
}

impl Config {
    /// Load from `path`, or defaults when it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.as_ref().display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = self.request_errors();
        if self.wallet.inkey.trim().is_empty() {
            errors.push(ValidationError {
                field: "wallet.inkey".to_string(),
                message: "invoice key cannot be empty".to_string(),
            });
        }
        into_result(errors)
    }

    /// Check the backend settings alone.
    pub fn validate_server(&self) -> Result<(), ConfigError> {
        into_result(self.server.validate())
    }

    /// Check only what authenticated registry requests need.
    pub fn validate_for_requests(&self) -> Result<(), ConfigError> {
        into_result(self.request_errors())
    }

    fn request_errors(&self) -> Vec<ValidationError> {
        let mut errors = self.server.validate();
        if self.wallet.adminkey.trim().is_empty() {
            errors.push(ValidationError {
                field: "wallet.adminkey".to_string(),
                message: "admin key cannot be empty".to_string(),
            });
        }
        errors
    }

    /// Scratch file location, falling back to the platform data directory.
    pub fn scratch_path(&self) -> PathBuf {
        self.scratch_path.clone().unwrap_or_else(default_scratch_path)
    }

    /// Copy with wallet keys masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.wallet.adminkey = mask(&copy.wallet.adminkey);
        copy.wallet.inkey = mask(&copy.wallet.inkey);
        copy
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend
    #[serde(default = "default_url")]
    pub url: String,

    /// Extension path the registry is mounted under
    #[serde(default = "default_mount")]
    pub mount: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            mount: default_mount(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push(ValidationError {
                field: "server.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            errors.push(ValidationError {
                field: "server.url".to_string(),
                message: format!(
                    "invalid URL '{}': must start with http:// or https://",
                    self.url
                ),
            });
        }

        if self.mount.trim_matches('/').is_empty() {
            errors.push(ValidationError {
                field: "server.mount".to_string(),
                message: "mount cannot be empty".to_string(),
            });
        } else if self.mount.trim_matches('/').contains('/') {
            errors.push(ValidationError {
                field: "server.mount".to_string(),
                message: format!("mount '{}' must be a single path segment", self.mount),
            });
        }

        if !(1..=300).contains(&self.timeout_secs) {
            errors.push(ValidationError {
                field: "server.timeout_secs".to_string(),
                message: format!(
                    "timeout must be between 1 and 300 seconds, got {}",
                    self.timeout_secs
                ),
            });
        }

        errors
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

fn default_mount() -> String {
    DEFAULT_MOUNT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        let head: String = key.chars().take(4).collect();
        format!("{}…", head)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `server.url`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lnpos")
        .join("config.toml")
}

/// Default scratch file location.
pub fn default_scratch_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lnpos")
        .join("scratch.json")
}
