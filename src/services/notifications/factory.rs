//! Builds notification services and the dispatcher from loaded settings.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::context::SendContext;
use super::dispatcher::Dispatcher;
use super::line::{DEFAULT_LINE_ENDPOINT, Line, LineOptions};
use super::plivo::{ClientOptions, MessageOptions, Plivo};
use super::provider::Notifier;
use crate::config::settings::{DispatchConfig, LineConfig, PlivoConfig, Settings};
use crate::error::NotifyResult;

/// Builds the LINE service described by `config`
pub fn line_service(config: &LineConfig) -> NotifyResult<Line> {
    let options = LineOptions {
        endpoint: config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_LINE_ENDPOINT.to_string()),
    };

    let mut line = Line::with_options(&config.channel_secret, &config.channel_access_token, options)?;
    line.add_receivers(config.receivers.iter().cloned());
    Ok(line)
}

/// Builds the Plivo service described by `config`
pub fn plivo_service(config: &PlivoConfig) -> NotifyResult<Plivo> {
    let mut plivo = Plivo::new(
        ClientOptions {
            auth_id: config.auth_id.clone(),
            auth_token: config.auth_token.clone(),
            endpoint: config.endpoint.clone(),
        },
        MessageOptions {
            source: config.source.clone(),
        },
    )?;
    plivo.add_receivers(config.receivers.iter().cloned());
    Ok(plivo)
}

/// Builds every enabled service, in a fixed order: LINE, then Plivo
pub fn build_services(settings: &Settings) -> NotifyResult<Vec<Arc<dyn Notifier>>> {
    let mut services: Vec<Arc<dyn Notifier>> = Vec::new();

    if settings.line.enabled {
        services.push(Arc::new(line_service(&settings.line)?));
        info!(
            service = "line",
            receivers = settings.line.receivers.len(),
            "notification service configured"
        );
    }

    if settings.plivo.enabled {
        services.push(Arc::new(plivo_service(&settings.plivo)?));
        info!(
            service = "plivo",
            receivers = settings.plivo.receivers.len(),
            "notification service configured"
        );
    }

    Ok(services)
}

/// Builds a dispatcher holding every enabled service
pub fn build_dispatcher(settings: &Settings) -> NotifyResult<Dispatcher> {
    let mut dispatcher = Dispatcher::with_mode(settings.dispatch.mode);
    dispatcher
        .set_enabled(settings.dispatch.enabled)
        .use_services(build_services(settings)?);
    Ok(dispatcher)
}

/// Fresh send context carrying the configured deadline
pub fn send_context(config: &DispatchConfig) -> SendContext {
    match config.timeout_seconds {
        0 => SendContext::new(),
        seconds => SendContext::new().with_timeout(Duration::from_secs(seconds)),
    }
}
