//! Command handlers for CLI operations
//!
//! This module contains handlers for the send and check commands.

pub mod check;
pub mod send;

pub use check::CheckCommandHandler;
pub use send::{SendCommandHandler, SendOverrides};

use crate::config::{ConfigError, Settings};
use crate::error::{NotifyError, NotifyResult};

/// Validates settings, reporting failures as configuration errors
pub(crate) fn validate_settings(settings: &Settings) -> NotifyResult<()> {
    settings.validate().map_err(|e| match e {
        ConfigError::ValidationError { field, message } => {
            NotifyError::configuration(field, message)
        }
        other => NotifyError::configuration("settings", other.to_string()),
    })
}
