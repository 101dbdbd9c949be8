//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

use crate::config::settings::MAX_TIMEOUT_SECONDS;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!(
            "Cannot read configuration file '{}': {}",
            path_str, e
        )),
    }
}

/// Validate a deadline in whole seconds; 0 means no deadline
pub fn validate_timeout(timeout_str: &str) -> Result<u64, String> {
    let seconds: u64 = timeout_str.trim().parse().map_err(|_| {
        format!(
            "Timeout must be a whole number of seconds, got: '{}'",
            timeout_str
        )
    })?;

    if seconds > MAX_TIMEOUT_SECONDS {
        return Err(format!(
            "Timeout cannot exceed {} seconds, got: {}",
            MAX_TIMEOUT_SECONDS, seconds
        ));
    }

    Ok(seconds)
}

/// Validate that a subject is not blank
pub fn validate_subject(subject: &str) -> Result<String, String> {
    if subject.trim().is_empty() {
        return Err("Subject cannot be empty".to_string());
    }
    Ok(subject.to_string())
}
