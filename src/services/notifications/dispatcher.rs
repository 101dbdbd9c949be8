//! Fan-out dispatcher.
//!
//! Sends one notification to every registered service and reports every
//! failure together. Services themselves stop at their first failing
//! receiver; the dispatcher never stops at a failing service.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::context::SendContext;
use super::provider::Notifier;
use crate::error::{AggregateError, NotifyResult, ServiceFailure};

/// How a dispatcher drives its services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// All services at once; no ordering between services
    #[default]
    #[serde(alias = "parallel")]
    Concurrent,
    /// One service after another, in registration order
    #[serde(alias = "serial")]
    Sequential,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Concurrent => "concurrent",
            DispatchMode::Sequential => "sequential",
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fans a notification out to every registered service
///
/// Registration needs `&mut self` and sending takes `&self`, so the service
/// list cannot change while a send is in flight.
///
/// # Example
/// ```ignore
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.use_service(line).use_service(plivo);
///
/// match dispatcher.send(&SendContext::new(), "subject", "message").await {
///     Ok(()) => {}
///     Err(NotifyError::Aggregate(failures)) => {
///         for failure in &failures {
///             eprintln!("{}", failure);
///         }
///     }
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    services: Vec<Arc<dyn Notifier>>,
    mode: DispatchMode,
    enabled: bool,
}

impl Dispatcher {
    /// Creates an enabled, concurrent dispatcher with no services
    pub fn new() -> Self {
        Self::with_mode(DispatchMode::Concurrent)
    }

    pub fn with_mode(mode: DispatchMode) -> Self {
        Self {
            services: Vec::new(),
            mode,
            enabled: true,
        }
    }

    /// Creates a dispatcher whose `send` does nothing until re-enabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DispatchMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Registers one service; the same service may be registered twice
    pub fn use_service<N>(&mut self, service: N) -> &mut Self
    where
        N: Notifier + 'static,
    {
        self.services.push(Arc::new(service));
        self
    }

    /// Registers services in the order given
    pub fn use_services<I>(&mut self, services: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Notifier>>,
    {
        self.services.extend(services);
        self
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Names of the registered services, in registration order
    pub fn service_names(&self) -> Vec<&'static str> {
        self.services.iter().map(|s| s.name()).collect()
    }

    /// Sends `subject` and `message` through every registered service
    ///
    /// # Returns
    /// - Ok(()) when disabled, when no service is registered, or when every
    ///   service succeeded
    /// - `NotifyError::Cancelled` when `ctx` is already done; no service runs
    /// - `NotifyError::Aggregate` listing every failing service otherwise
    pub async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()> {
        if !self.enabled {
            debug!("dispatcher disabled, skipping notification");
            return Ok(());
        }

        if self.services.is_empty() {
            debug!("no notification services registered");
            return Ok(());
        }

        ctx.check()?;

        debug!(
            mode = %self.mode,
            services = self.services.len(),
            "dispatching notification"
        );

        let failures = match self.mode {
            DispatchMode::Concurrent => self.send_concurrent(ctx, subject, message).await,
            DispatchMode::Sequential => self.send_sequential(ctx, subject, message).await,
        };

        if failures.is_empty() {
            info!(services = self.services.len(), "notification sent");
            return Ok(());
        }

        warn!(
            failed = failures.len(),
            services = self.services.len(),
            "notification failed for some services"
        );
        Err(AggregateError::new(failures).into())
    }

    async fn send_concurrent(
        &self,
        ctx: &SendContext,
        subject: &str,
        message: &str,
    ) -> Vec<ServiceFailure> {
        let sends = self.services.iter().enumerate().map(|(index, service)| {
            let ctx = ctx.clone();
            async move {
                let result = service.send(&ctx, subject, message).await;
                (index, service.name(), result)
            }
        });

        join_all(sends)
            .await
            .into_iter()
            .filter_map(|(index, name, result)| failure(index, name, result))
            .collect()
    }

    async fn send_sequential(
        &self,
        ctx: &SendContext,
        subject: &str,
        message: &str,
    ) -> Vec<ServiceFailure> {
        let mut failures = Vec::new();

        for (index, service) in self.services.iter().enumerate() {
            let result = service.send(ctx, subject, message).await;
            failures.extend(failure(index, service.name(), result));
        }

        failures
    }
}

fn failure(index: usize, service: &str, result: NotifyResult<()>) -> Option<ServiceFailure> {
    let error = result.err()?;
    warn!(service, index, error = %error, "notification service failed");

    Some(ServiceFailure {
        index,
        service: service.to_string(),
        error,
    })
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("services", &self.service_names())
            .field("mode", &self.mode)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[async_trait]
impl Notifier for Dispatcher {
    async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()> {
        Dispatcher::send(self, ctx, subject, message).await
    }

    fn name(&self) -> &'static str {
        "dispatcher"
    }
}
