//! Vendor client capability and the shared receiver loop.
//!
//! Provider adapters are thin: they own a `Deliver` client and a receiver
//! list, and hand both to `deliver_to_all`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::context::SendContext;
use crate::error::{NotifyError, NotifyResult};

/// Delivers one text message to one receiver
///
/// Implemented by the vendor HTTP clients (`LineClient`, `PlivoClient`) and
/// by any custom transport passed to an adapter's `from_client`.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, ctx: &SendContext, receiver: &str, text: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl<T: Deliver + ?Sized> Deliver for Arc<T> {
    async fn deliver(&self, ctx: &SendContext, receiver: &str, text: &str) -> anyhow::Result<()> {
        (**self).deliver(ctx, receiver, text).await
    }
}

/// Subject on the first line, message on the next
pub fn compose_text(subject: &str, message: &str) -> String {
    format!("{}\n{}", subject, message)
}

/// Delivers `text` to each receiver in registration order
///
/// Checks `ctx` before every delivery and stops at the first failing
/// receiver; receivers after it are never contacted.
pub(crate) async fn deliver_to_all<D>(
    service: &str,
    client: &D,
    ctx: &SendContext,
    receivers: &[String],
    text: &str,
) -> NotifyResult<()>
where
    D: Deliver + ?Sized,
{
    for receiver in receivers {
        ctx.check()?;

        debug!(service, receiver = %receiver, "delivering message");
        client
            .deliver(ctx, receiver, text)
            .await
            .map_err(|e| NotifyError::delivery(service, receiver.as_str(), e))?;
    }

    Ok(())
}
