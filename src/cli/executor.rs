//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading, plus the mapping from errors to
//! process exit codes.

use super::handlers::{CheckCommandHandler, SendCommandHandler, SendOverrides};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{NotifyError, NotifyResult};

/// Exit code for a delivery failure
pub const EXIT_DELIVERY: i32 = 1;
/// Exit code for invalid configuration
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for an interrupted or timed out send (128 + SIGINT)
pub const EXIT_CANCELLED: i32 = 130;

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> NotifyResult<()> {
    match &cli.command {
        Commands::Send {
            subject,
            message,
            timeout,
            mode,
        } => {
            let overrides = SendOverrides {
                timeout_seconds: *timeout,
                mode: mode.map(Into::into),
            };
            SendCommandHandler::new(settings)
                .execute(subject, message, overrides)
                .await
        }
        Commands::Check => CheckCommandHandler::new(settings).execute().await,
    }
}

/// Process exit code for a failed command
pub fn exit_code(err: &NotifyError) -> i32 {
    if err.is_cancelled() {
        EXIT_CANCELLED
    } else if err.is_configuration() {
        EXIT_CONFIGURATION
    } else {
        EXIT_DELIVERY
    }
}

/// Print a command failure to stderr, one line per failed service
pub fn report_error(err: &NotifyError) {
    match err {
        NotifyError::Aggregate(aggregate) => {
            eprintln!("Error: {} notification service(s) failed", aggregate.len());
            for failure in aggregate {
                eprintln!("  - {}", failure);
            }
        }
        other => eprintln!("Error: {}", error_chain(other)),
    }
}

fn error_chain(err: &NotifyError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
