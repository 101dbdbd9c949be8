//! CLI module for notify-relay
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration loading with CLI overrides
//! - Command handlers for send and check operations

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use executor::{execute_command, exit_code, report_error};
pub use parser::{Cli, Commands, Environment, Mode};

use crate::config::{ConfigError, ConfigLoader, Settings};
use crate::logger::LoggerConfig;

/// Load settings for the parsed command line
///
/// `--config` selects a single file; otherwise the layered files in
/// `NOTIFY_CONFIG_DIR` (default `./config`) are read. `--env` overrides
/// `NOTIFY_APP_ENV`.
///
/// # Errors
/// Returns error if configuration loading or validation fails
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let loader = match cli.config {
        Some(ref path) => ConfigLoader::from_file(path),
        None => ConfigLoader::new()?,
    };

    let loader = match cli.env {
        Some(env) => loader.with_environment(env.into()),
        None => loader,
    };

    loader.load()
}

/// Logger configuration from settings, with `-v`/`-q` applied
///
/// # Errors
/// Returns error if the logger section cannot be converted
pub fn logger_config(cli: &Cli, settings: &Settings) -> Result<LoggerConfig, ConfigError> {
    let config = settings.logger.clone().into_logger_config()?;
    Ok(match cli.log_level_override() {
        Some(level) => config.with_level(level),
        None => config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_settings_from_file() {
        let _lock = test_env::lock();
        let file = config_file(
            r#"
            [dispatch]
            mode = "sequential"

            [line]
            enabled = true
            channel_secret = "secret"
            channel_access_token = "token"
            receivers = ["U1"]
            "#,
        );
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["notify-relay", "--config", path, "check"]).unwrap();

        let settings = load_settings(&cli).unwrap();
        assert!(settings.line.enabled);
        assert_eq!(settings.line.channel_secret, "secret");
        assert_eq!(
            settings.dispatch.mode,
            crate::services::notifications::DispatchMode::Sequential
        );
    }

    #[test]
    fn test_load_settings_rejects_invalid_file() {
        let _lock = test_env::lock();
        let file = config_file(
            r#"
            [plivo]
            enabled = true
            "#,
        );
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["notify-relay", "-c", path, "check"]).unwrap();

        assert!(matches!(
            load_settings(&cli),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_logger_config_overrides() {
        let settings = Settings::default();

        let cli = Cli::try_parse_from(["notify-relay", "-q", "check"]).unwrap();
        assert_eq!(logger_config(&cli, &settings).unwrap().level, "error");

        let cli = Cli::try_parse_from(["notify-relay", "check"]).unwrap();
        assert_eq!(
            logger_config(&cli, &settings).unwrap().level,
            settings.logger.level
        );
    }
}
