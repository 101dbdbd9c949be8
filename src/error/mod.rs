mod aggregate;
mod notify_error;

pub use aggregate::{AggregateError, ServiceFailure};
pub use notify_error::{CancelReason, NotifyError, NotifyResult, VendorError};
