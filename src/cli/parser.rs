//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Environment as AppEnvironment;
use crate::services::notifications::DispatchMode;

/// Send one notification to every configured messaging service
#[derive(Parser, Debug)]
#[command(name = "notify-relay")]
#[command(about = "Send one notification to every configured messaging service")]
#[command(long_about = "
notify-relay sends a subject and message to every receiver of every enabled
service (LINE, Plivo) and reports each service that failed.

EXAMPLES:
    # Send with the layered configuration in ./config
    notify-relay send --subject \"Deploy\" --message \"v1.4.2 is live\"

    # Use a single configuration file
    notify-relay --config /etc/notify-relay/relay.toml send -s Alert -m \"disk full\"

    # Give up after 5 seconds, one service at a time
    notify-relay send -s Alert -m \"disk full\" --timeout 5 --mode sequential

    # Check configuration and credentials without sending
    notify-relay check
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load this TOML file instead of the layered files in ./config
    /// (or `NOTIFY_CONFIG_DIR`). `NOTIFY_*` environment variables still
    /// override its values.
    ///
    /// Example: --config /etc/notify-relay/relay.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a notification through every enabled service
    ///
    /// Each receiver gets the subject on the first line and the message on
    /// the next. Exits non-zero if any service failed.
    Send {
        /// Notification subject
        #[arg(short, long, value_parser = super::validation::validate_subject)]
        subject: String,

        /// Notification body
        #[arg(short, long)]
        message: String,

        /// Give up starting new deliveries after this many seconds
        ///
        /// Overrides dispatch.timeout_seconds; 0 disables the deadline.
        #[arg(short, long, value_name = "SECONDS", value_parser = super::validation::validate_timeout)]
        timeout: Option<u64>,

        /// Override dispatch.mode
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },

    /// Validate configuration and build every enabled service without sending
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for AppEnvironment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => AppEnvironment::Development,
            Environment::Test => AppEnvironment::Test,
            Environment::Staging => AppEnvironment::Staging,
            Environment::Production => AppEnvironment::Production,
        }
    }
}

/// Dispatch mode options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    #[value(name = "concurrent", alias = "parallel")]
    Concurrent,
    #[value(name = "sequential", alias = "serial")]
    Sequential,
}

impl From<Mode> for DispatchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Concurrent => DispatchMode::Concurrent,
            Mode::Sequential => DispatchMode::Sequential,
        }
    }
}

impl Cli {
    /// Log level implied by --verbose / --quiet, if either is set
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
