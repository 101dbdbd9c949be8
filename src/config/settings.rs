//! Configuration settings structures for notify-relay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
use crate::services::notifications::DispatchMode;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "notify-relay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/notify-relay.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Longest send deadline accepted from configuration or `--timeout` (one hour)
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name, used as the log span name
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

// ============================================================================
// Dispatch Configuration
// ============================================================================

/// How the dispatcher fans notifications out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// `concurrent` or `sequential`
    #[serde(default)]
    pub mode: DispatchMode,

    /// When false every send is a successful no-op
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Deadline for a whole send in seconds, 0 disables it; at most
    /// `MAX_TIMEOUT_SECONDS`
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            enabled: true,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// LINE Messaging API service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LineConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub channel_secret: String,

    #[serde(default)]
    pub channel_access_token: String,

    /// Base URL override for the Messaging API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// User, group or room IDs
    #[serde(default)]
    pub receivers: Vec<String>,
}

/// Plivo SMS service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlivoConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Falls back to `PLIVO_AUTH_ID` when empty
    #[serde(default)]
    pub auth_id: String,

    /// Falls back to `PLIVO_AUTH_TOKEN` when empty
    #[serde(default)]
    pub auth_token: String,

    /// Sender number
    #[serde(default)]
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Destination phone numbers
    #[serde(default)]
    pub receivers: Vec<String>,
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// `full`, `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: default_log_format(),
        }
    }
}

/// Logger settings as they appear in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert to the logger module's configuration type
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format: LogFormat = self
            .file
            .format
            .parse()
            .map_err(|e: crate::logger::LoggerError| {
                ConfigError::validation("logger.file.format".to_string(), e.to_string())
            })?;

        Ok(LoggerConfig {
            level: self.level,
            console: ConsoleConfig {
                enabled: self.console.enabled,
                colored: self.console.colored,
            },
            file: FileConfig {
                enabled: self.file.enabled,
                path: PathBuf::from(self.file.path),
                append: self.file.append,
                format,
            },
        })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Dispatcher configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// LINE service
    #[serde(default)]
    pub line: LineConfig,

    /// Plivo service
    #[serde(default)]
    pub plivo: PlivoConfig,
}

impl Settings {
    /// Names of the services switched on in this configuration
    pub fn enabled_services(&self) -> Vec<&'static str> {
        let mut services = Vec::new();
        if self.line.enabled {
            services.push("line");
        }
        if self.plivo.enabled {
            services.push("plivo");
        }
        services
    }
}
