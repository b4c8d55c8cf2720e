//! Serializable logger configuration
//!
//! ```
//! use interlaced_logger::{LogLevel, LoggerConfig};
//!
//! let config: LoggerConfig = serde_json::from_str(r#"{
//!     "level": "Warning",
//!     "prefix": "api",
//!     "file": {
//!         "path": "/tmp/api.log",
//!         "rotation": { "kind": "size", "max_bytes": 1048576, "max_files": 3 }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.level, LogLevel::Warning);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use crate::sinks::rotation::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Rotation settings as they appear in a config file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationConfig {
    #[default]
    None,
    Size { max_bytes: u64, max_files: usize },
    Interval { seconds: u64, max_files: usize },
}

impl RotationConfig {
    pub fn to_policy(&self) -> RotationPolicy {
        match *self {
            RotationConfig::None => RotationPolicy::None,
            RotationConfig::Size { max_bytes, max_files } => {
                RotationPolicy::BySize { max_bytes, max_files }
            }
            RotationConfig::Interval { seconds, max_files } => RotationPolicy::ByInterval {
                interval: Duration::from_secs(seconds),
                max_files,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub rotation: RotationConfig,
}

/// Logger settings; every field is optional in serialized form
///
/// Without `file` the logger writes to stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub timestamp_format: TimestampFormat,
    pub prefix: Option<String>,
    pub file: Option<FileConfig>,
}

impl LoggerConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the timestamp pattern and file settings without touching the
    /// filesystem
    pub fn validate(&self) -> Result<()> {
        self.timestamp_format.validate()?;
        if let Some(ref file) = self.file {
            if file.path.as_os_str().is_empty() {
                return Err(LoggerError::config("file sink", "path must not be empty"));
            }
            file.rotation.to_policy().validate()?;
        }
        Ok(())
    }
}
