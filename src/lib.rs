//! notify-relay
//!
//! Sends one notification to every configured messaging service (LINE,
//! Plivo) through a single `Dispatcher`, and reports each service that
//! failed.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod services;

pub use error::{AggregateError, CancelReason, NotifyError, NotifyResult, ServiceFailure};
pub use services::notifications::{
    DispatchMode, Dispatcher, Line, LineClient, Notifier, Plivo, PlivoClient, SendContext,
};

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
