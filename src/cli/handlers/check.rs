//! Check command handler
//!
//! Validates settings and builds every enabled service without sending.

use crate::config::settings::Settings;
use crate::error::NotifyResult;
use crate::services::notifications::factory;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    /// Create a new check command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration and construct the dispatcher
    ///
    /// Building the services resolves credentials (including the Plivo
    /// environment fallback) and parses endpoints, so a passing check means
    /// `send` will not fail on configuration.
    pub async fn execute(&self) -> NotifyResult<()> {
        super::validate_settings(&self.config)?;
        println!("✓ Configuration is valid");

        let dispatcher = factory::build_dispatcher(&self.config)?;
        for (name, receivers) in self.receiver_counts() {
            println!("✓ {} configured with {} receiver(s)", name, receivers);
        }

        if dispatcher.is_empty() {
            println!("! No notification services are enabled");
        }
        if !dispatcher.is_enabled() {
            println!("! Dispatcher is disabled; sends are no-ops");
        }

        println!(
            "✓ Dispatch mode: {}, timeout: {}",
            dispatcher.mode(),
            match self.config.dispatch.timeout_seconds {
                0 => "none".to_string(),
                seconds => format!("{}s", seconds),
            }
        );
        println!("Check completed successfully");
        Ok(())
    }

    fn receiver_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts = Vec::new();
        if self.config.line.enabled {
            counts.push(("line", self.config.line.receivers.len()));
        }
        if self.config.plivo.enabled {
            counts.push(("plivo", self.config.plivo.receivers.len()));
        }
        counts
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
