use thiserror::Error;

use super::aggregate::AggregateError;

/// Crate-wide error type for building notifiers and dispatching messages.
///
/// Each variant is a distinct kind so callers can tell a rejected message
/// apart from a bad configuration or a cancelled dispatch without parsing
/// strings.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Invalid credentials or options at construction time
    #[error("Configuration error for {key}: {reason}")]
    Configuration { key: String, reason: String },

    /// A single receiver delivery failed at the vendor boundary
    #[error("Failed to send message to {service} receiver '{receiver}'")]
    Delivery {
        service: String,
        receiver: String,
        #[source]
        source: anyhow::Error,
    },

    /// The send context was cancelled or its deadline passed
    #[error("Notification aborted: {reason}")]
    Cancelled { reason: CancelReason },

    /// One or more services registered with a dispatcher failed
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl NotifyError {
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn delivery(
        service: impl Into<String>,
        receiver: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Delivery {
            service: service.into(),
            receiver: receiver.into(),
            source: source.into(),
        }
    }

    pub fn cancelled(reason: CancelReason) -> Self {
        Self::Cancelled { reason }
    }

    /// True for a cancellation, or for an aggregate made only of cancellations.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled { .. } => true,
            Self::Aggregate(aggregate) => {
                !aggregate.is_empty() && aggregate.iter().all(|f| f.error.is_cancelled())
            }
            _ => false,
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Receiver named by a delivery error
    pub fn receiver(&self) -> Option<&str> {
        match self {
            Self::Delivery { receiver, .. } => Some(receiver),
            _ => None,
        }
    }
}

/// Why a send context stopped accepting new deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Cancelled,
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Cancelled => write!(f, "context cancelled"),
            CancelReason::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

/// Errors returned by vendor HTTP APIs
#[derive(Error, Debug)]
pub enum VendorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Type alias for Result with NotifyError
pub type NotifyResult<T> = Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotifyError::configuration("line.channel_secret", "cannot be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error for line.channel_secret: cannot be empty"
        );

        let err = NotifyError::delivery("line", "U123", anyhow::anyhow!("boom"));
        assert_eq!(
            err.to_string(),
            "Failed to send message to line receiver 'U123'"
        );

        let err = NotifyError::cancelled(CancelReason::DeadlineExceeded);
        assert_eq!(
            err.to_string(),
            "Notification aborted: context deadline exceeded"
        );
    }

    #[test]
    fn test_delivery_keeps_source_chain() {
        let err = NotifyError::delivery(
            "plivo",
            "+15550001",
            VendorError::Api {
                status: 401,
                message: "unauthorized".to_string(),
            },
        );

        let source = std::error::Error::source(&err).expect("delivery error has a source");
        assert_eq!(
            source.to_string(),
            "API responded with status 401: unauthorized"
        );
        assert_eq!(err.receiver(), Some("+15550001"));
        assert!(err.is_delivery());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(NotifyError::cancelled(CancelReason::Cancelled).is_cancelled());
        assert!(NotifyError::configuration("k", "r").is_configuration());
        assert!(NotifyError::configuration("k", "r").receiver().is_none());
    }
}
