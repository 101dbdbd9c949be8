//! Core notifier trait.
//!
//! Every provider adapter and the dispatcher itself implement `Notifier`,
//! so a dispatcher can hold any mix of them behind `Arc<dyn Notifier>`.

use super::context::SendContext;
use crate::error::NotifyResult;
use async_trait::async_trait;

/// Trait for notification services (LINE, Plivo, nested dispatchers, ...)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All services must be Send + Sync so a dispatcher can drive them concurrently.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct Stdout;
///
/// #[async_trait]
/// impl Notifier for Stdout {
///     async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()> {
///         ctx.check()?;
///         println!("{}\n{}", subject, message);
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `subject` and `message` to every receiver of the service
    ///
    /// # Returns
    /// Ok(()) when every receiver accepted the message
    async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()>;

    /// Returns the service name for logging and error reports
    fn name(&self) -> &'static str;
}
