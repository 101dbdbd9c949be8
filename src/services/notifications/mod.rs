//! Notification system with pluggable services.
//!
//! The core trait `Notifier` is implemented by every provider service (LINE,
//! Plivo) and by the `Dispatcher`, which fans one notification out to all
//! registered services. Vendor HTTP APIs sit behind the `Deliver` trait so
//! services can be driven by any transport.

mod context;
mod deliver;
mod dispatcher;
mod provider;

pub mod factory;
pub mod line;
pub mod plivo;

pub use context::SendContext;
pub use deliver::{Deliver, compose_text};
pub use dispatcher::{DispatchMode, Dispatcher};
pub use line::{Line, LineClient, LineOptions};
pub use plivo::{ClientOptions, MessageOptions, Plivo, PlivoClient};
pub use provider::Notifier;
