//! Multi-error returned by a dispatcher when one or more services fail.

use std::fmt;

use super::notify_error::NotifyError;

/// Failure of a single service inside a dispatch
#[derive(Debug)]
pub struct ServiceFailure {
    /// Registration position of the service in the dispatcher
    pub index: usize,
    /// Name reported by the service
    pub service: String,
    pub error: NotifyError,
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.index, self.service, self.error)?;

        let mut source = std::error::Error::source(&self.error);
        while let Some(cause) = source {
            write!(f, ": {}", cause)?;
            source = std::error::Error::source(cause);
        }

        Ok(())
    }
}

/// Every service failure from one dispatch, in registration order
#[derive(Debug, Default)]
pub struct AggregateError {
    failures: Vec<ServiceFailure>,
}

impl AggregateError {
    pub fn new(failures: Vec<ServiceFailure>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[ServiceFailure] {
        &self.failures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceFailure> {
        self.failures.iter()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Looks up the failure recorded for a service name
    pub fn find(&self, service: &str) -> Option<&ServiceFailure> {
        self.failures.iter().find(|f| f.service == service)
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 {
            "service"
        } else {
            "services"
        };
        write!(f, "{} notification {} failed", self.failures.len(), noun)?;

        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }

        Ok(())
    }
}

impl std::error::Error for AggregateError {}

impl IntoIterator for AggregateError {
    type Item = ServiceFailure;
    type IntoIter = std::vec::IntoIter<ServiceFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a ServiceFailure;
    type IntoIter = std::slice::Iter<'a, ServiceFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancelReason;

    fn sample() -> AggregateError {
        AggregateError::new(vec![
            ServiceFailure {
                index: 0,
                service: "line".to_string(),
                error: NotifyError::delivery("line", "U1", anyhow::anyhow!("bad token")),
            },
            ServiceFailure {
                index: 2,
                service: "plivo".to_string(),
                error: NotifyError::cancelled(CancelReason::Cancelled),
            },
        ])
    }

    #[test]
    fn test_display_lists_every_failure() {
        let message = sample().to_string();
        assert!(message.starts_with("2 notification services failed"));
        assert!(message.contains("[0] line: Failed to send message to line receiver 'U1': bad token"));
        assert!(message.contains("[2] plivo: Notification aborted: context cancelled"));
    }

    #[test]
    fn test_iteration_preserves_order() {
        let aggregate = sample();
        let services: Vec<_> = aggregate.iter().map(|f| f.service.as_str()).collect();
        assert_eq!(services, vec!["line", "plivo"]);

        let owned: Vec<ServiceFailure> = aggregate.into_iter().collect();
        assert_eq!(owned[1].index, 2);
    }

    #[test]
    fn test_find_by_service() {
        let aggregate = sample();
        assert_eq!(aggregate.find("line").map(|f| f.index), Some(0));
        assert!(aggregate.find("telegram").is_none());
    }

    #[test]
    fn test_cancelled_only_when_every_failure_is_cancellation() {
        let mixed = NotifyError::Aggregate(sample());
        assert!(!mixed.is_cancelled());

        let cancelled = NotifyError::Aggregate(AggregateError::new(vec![ServiceFailure {
            index: 0,
            service: "line".to_string(),
            error: NotifyError::cancelled(CancelReason::DeadlineExceeded),
        }]));
        assert!(cancelled.is_cancelled());
    }
}
