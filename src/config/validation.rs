//! Configuration validation logic
//!
//! Checks each section before any service is built, so a bad file is reported
//! with the offending key instead of surfacing later as a send failure.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DispatchConfig, LineConfig, LoggerSettings, MAX_TIMEOUT_SECONDS, PlivoConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn validate_endpoint(field: &str, endpoint: Option<&str>) -> Result<(), ConfigError> {
    match endpoint {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
            ConfigError::validation(field, format!("Endpoint must be an http(s) URL, got '{}'", url)),
        ),
        _ => Ok(()),
    }
}

fn validate_receivers(field: &str, receivers: &[String]) -> Result<(), ConfigError> {
    if receivers.iter().any(|r| r.trim().is_empty()) {
        return Err(ConfigError::validation(
            field,
            "Receiver IDs cannot be blank",
        ));
    }
    Ok(())
}

impl DispatchConfig {
    /// Validate dispatcher configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(ConfigError::validation(
                "dispatch.timeout_seconds",
                format!(
                    "Timeout cannot exceed {} seconds, got {}",
                    MAX_TIMEOUT_SECONDS, self.timeout_seconds
                ),
            ));
        }
        Ok(())
    }
}

impl LineConfig {
    /// Validate LINE configuration
    ///
    /// # Validation Rules
    /// - Disabled sections are not checked
    /// - Channel secret and access token must be set
    /// - Endpoint, when set, must be an http(s) URL
    /// - Receiver IDs must not be blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.channel_secret.trim().is_empty() {
            return Err(ConfigError::validation(
                "line.channel_secret",
                "Channel secret is required when LINE is enabled.",
            ));
        }

        if self.channel_access_token.trim().is_empty() {
            return Err(ConfigError::validation(
                "line.channel_access_token",
                "Channel access token is required when LINE is enabled.",
            ));
        }

        validate_endpoint("line.endpoint", self.endpoint.as_deref())?;
        validate_receivers("line.receivers", &self.receivers)
    }
}

impl PlivoConfig {
    /// Validate Plivo configuration
    ///
    /// Credentials may stay empty here; they are resolved from
    /// `PLIVO_AUTH_ID` / `PLIVO_AUTH_TOKEN` when the client is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.source.trim().is_empty() {
            return Err(ConfigError::validation(
                "plivo.source",
                "Source number is required when Plivo is enabled.",
            ));
        }

        validate_endpoint("plivo.endpoint", self.endpoint.as_deref())?;
        validate_receivers("plivo.receivers", &self.receivers)
    }
}

impl LoggerSettings {
    /// Validate logger configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        let format = self.file.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file output is enabled.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.dispatch.validate()?;
        self.line.validate()?;
        self.plivo.validate()?;
        Ok(())
    }
}
