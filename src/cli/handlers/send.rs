//! Send command handler
//!
//! Builds the dispatcher from settings and sends one notification through it.

use tracing::{info, warn};

use crate::config::settings::{DispatchConfig, Settings};
use crate::error::NotifyResult;
use crate::services::notifications::{DispatchMode, factory};

/// Command-line overrides applied on top of `[dispatch]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOverrides {
    pub timeout_seconds: Option<u64>,
    pub mode: Option<DispatchMode>,
}

impl SendOverrides {
    fn apply(&self, mut dispatch: DispatchConfig) -> DispatchConfig {
        if let Some(timeout) = self.timeout_seconds {
            dispatch.timeout_seconds = timeout;
        }
        if let Some(mode) = self.mode {
            dispatch.mode = mode;
        }
        dispatch
    }
}

/// Handler for the send command
pub struct SendCommandHandler {
    config: Settings,
}

impl SendCommandHandler {
    /// Create a new send command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Send `subject` and `message` through every enabled service
    ///
    /// Ctrl-C cancels the send context; deliveries already in flight finish,
    /// no new receiver is contacted.
    ///
    /// # Errors
    /// - Configuration errors from invalid settings or service options
    /// - `Aggregate` listing every service that failed
    pub async fn execute(
        &self,
        subject: &str,
        message: &str,
        overrides: SendOverrides,
    ) -> NotifyResult<()> {
        super::validate_settings(&self.config)?;

        let dispatch = overrides.apply(self.config.dispatch.clone());
        let mut dispatcher = factory::build_dispatcher(&self.config)?;
        dispatcher.set_mode(dispatch.mode);

        if !dispatcher.is_enabled() {
            println!("Dispatcher is disabled; nothing sent");
            return Ok(());
        }
        if dispatcher.is_empty() {
            warn!("no notification services are enabled");
            println!("No notification services enabled; nothing sent");
            return Ok(());
        }

        let ctx = factory::send_context(&dispatch);
        let token = ctx.token().clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling notification");
                token.cancel();
            }
        });

        let result = dispatcher.send(&ctx, subject, message).await;
        interrupt.abort();
        result?;

        let services = dispatcher.service_names();
        info!(services = ?services, "notification sent");
        println!("✓ Notification sent via {}", services.join(", "));
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
