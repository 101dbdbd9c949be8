//! Cancellation and deadline carrier threaded through every send.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CancelReason, NotifyError, NotifyResult};

/// Cancellable, deadline-bearing context for a dispatch
///
/// Clones share the same cancellation token, so cancelling any clone stops
/// every service that received one. Cancellation is cooperative: services
/// check the context before each receiver delivery and never abort a vendor
/// request that is already in flight.
///
/// # Example
/// ```ignore
/// let ctx = SendContext::new().with_timeout(Duration::from_secs(10));
/// dispatcher.send(&ctx, "subject", "message").await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SendContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl SendContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets a deadline `timeout` from now, keeping any earlier deadline
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline, keeping any earlier deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Derives a context that is cancelled with this one but can also be
    /// cancelled on its own
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Time left before the deadline, `None` when no deadline is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Why the context is done, if it is
    pub fn done_reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done_reason().is_some()
    }

    /// Returns a cancellation error when the context is done
    pub fn check(&self) -> NotifyResult<()> {
        match self.done_reason() {
            Some(reason) => Err(NotifyError::cancelled(reason)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_not_done() {
        let ctx = SendContext::new();
        assert!(!ctx.is_done());
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = SendContext::new();
        let clone = ctx.clone();

        ctx.cancel();

        assert_eq!(clone.done_reason(), Some(CancelReason::Cancelled));
        let err = clone.check().expect_err("clone must observe cancellation");
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_child_cancel_does_not_reach_parent() {
        let parent = SendContext::new();
        let child = parent.child();

        child.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());

        let other_child = parent.child();
        parent.cancel();
        assert!(other_child.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = SendContext::new().with_timeout(Duration::from_secs(5));
        assert!(ctx.check().is_ok());

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(ctx.done_reason(), Some(CancelReason::DeadlineExceeded));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_deadline_wins() {
        let ctx = SendContext::new()
            .with_timeout(Duration::from_secs(2))
            .with_timeout(Duration::from_secs(60));

        assert_eq!(ctx.remaining(), Some(Duration::from_secs(2)));
    }
}
