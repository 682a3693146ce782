//! Configuration management for canteen-export
//!
//! The export takes an explicit [`Config`] value; nothing is read from global
//! state once the value has been built. Sources, highest precedence first:
//! 1. Command-line arguments
//! 2. Environment variables (`MONGO_URI`, after loading `.env`)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! The connection URI has no default and is never taken from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable holding the MongoDB connection string.
pub const MONGO_URI_ENV: &str = "MONGO_URI";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// What to read and where to write it
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// MongoDB connection URI, only ever set from the environment
    #[serde(skip)]
    pub uri: Option<String>,

    /// Server selection and connect timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

/// Export job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Database holding both collections
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection scanned for orders
    #[serde(default = "default_orders_collection")]
    pub orders_collection: String,

    /// Collection used to resolve order users
    #[serde(default = "default_users_collection")]
    pub users_collection: String,

    /// CSV file to replace, relative to the working directory
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Number of order documents pulled from the cursor at a time
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// How user references are resolved
    #[serde(default)]
    pub lookup: LookupMode,

    /// Show a progress bar on stderr
    #[serde(default)]
    pub progress: bool,
}

/// User lookup strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LookupMode {
    /// One `find_one` per order
    #[default]
    PerOrder,

    /// Remember every resolved reference for the rest of the run
    Cached,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_app_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_database() -> String {
    "canteen-db".to_string()
}

fn default_orders_collection() -> String {
    "orders".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("src/Data/extract_data.csv")
}

fn default_batch_size() -> u32 {
    1000
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: None,
            timeout: default_timeout(),
            app_name: default_app_name(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            orders_collection: default_orders_collection(),
            users_collection: default_users_collection(),
            output_path: default_output_path(),
            batch_size: default_batch_size(),
            lookup: LookupMode::default(),
            progress: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load an explicit file, or the default file if it exists, or defaults
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    tracing::debug!("Loading config from {}", default_path.display());
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".canteen-export")
            .join("config.toml")
    }

    /// Apply environment variables from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment variables using the given lookup
    ///
    /// Blank values count as unset.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup(MONGO_URI_ENV).filter(|v| !v.trim().is_empty()) {
            self.connection.uri = Some(uri);
        }
    }

    /// Get the connection URI, failing if it was never supplied
    pub fn require_uri(&self) -> Result<&str> {
        self.connection
            .uri
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField(MONGO_URI_ENV.to_string()).into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let export = &self.export;

        for (field, value) in [
            ("export.database", &export.database),
            ("export.orders_collection", &export.orders_collection),
            ("export.users_collection", &export.users_collection),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }

        if export.output_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("export.output_path".to_string()).into());
        }

        if export.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.batch_size".to_string(),
                value: export.batch_size.to_string(),
            }
            .into());
        }

        if self.connection.timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connection.timeout".to_string(),
                value: self.connection.timeout.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl ConnectionConfig {
    /// Connect and server selection timeout
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
