//! # Application Configuration
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file (`$ATTENDANCE_CONFIG`, or `attendance.yaml` in
//!    the working directory)
//! 3. environment variables
//!
//! ## YAML Format
//!
//! ```yaml
//! bind_addr: "127.0.0.1:3000"
//! database_url: "sqlite:///var/lib/attendance/attendance.db"
//! cors_origin: "http://localhost:8080"
//! static_dir: "./dist"
//! summary:
//!   model: "gemini-3-flash-preview"
//!   timeout_secs: 30
//!   language: "English"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_PATH_VAR: &str = "ATTENDANCE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "attendance.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// SQLite URL; the platform data directory is used when unset
    pub database_url: Option<String>,
    pub cors_origin: String,
    /// Built frontend to serve for non-API paths
    pub static_dir: Option<PathBuf>,
    pub summary: SummaryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            cors_origin: "http://localhost:8080".to_string(),
            static_dir: None,
            summary: SummaryConfig::default(),
        }
    }
}

/// Text generation settings for attendance summaries
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Language the report is written in
    pub language: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
            language: "English".to_string(),
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from file and process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Override fields from environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ATTENDANCE_BIND_ADDR") {
            self.bind_addr = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "ATTENDANCE_BIND_ADDR",
                value,
            })?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.database_url = Some(value);
        }
        if let Some(value) = lookup("ATTENDANCE_CORS_ORIGIN") {
            self.cors_origin = value;
        }
        if let Some(value) = lookup("ATTENDANCE_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.summary.api_key = Some(value);
        }
        if let Some(value) = lookup("GEMINI_MODEL") {
            self.summary.model = value;
        }
        if let Some(value) = lookup("GEMINI_BASE_URL") {
            self.summary.base_url = value;
        }
        if let Some(value) = lookup("SUMMARY_TIMEOUT_SECS") {
            self.summary.timeout_secs = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "SUMMARY_TIMEOUT_SECS",
                value,
            })?;
        }
        if let Some(value) = lookup("SUMMARY_LANGUAGE") {
            self.summary.language = value;
        }
        Ok(())
    }
}

/// `<data dir>/attendance-tracker/attendance.db`, or `./attendance.db` when
/// the platform has no data directory
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("attendance-tracker").join("attendance.db"),
        None => PathBuf::from("attendance.db"),
    }
}
