//! Service layer.
//!
//! Notification services and the dispatcher that composes them.

pub mod notifications;

pub use notifications::{Dispatcher, Notifier, SendContext};
