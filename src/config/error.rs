//! Configuration error types

use thiserror::Error;

/// Errors raised while locating, parsing or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Settings could not be deserialized
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds an unusable value
    #[error("Invalid value for {field}: {message}")]
    ValidationError { field: String, message: String },

    /// A `NOTIFY_*` variable holds an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// `NOTIFY_CONFIG_DIR` and `NOTIFY_CONFIG_FILE` were both set
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = ConfigError::validation("line.channel_secret", "cannot be empty");
        assert_eq!(
            err.to_string(),
            "Invalid value for line.channel_secret: cannot be empty"
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let err = ConfigError::file_not_found("config/default.toml");
        assert_eq!(
            err.to_string(),
            "Configuration file not found: config/default.toml"
        );
    }
}
