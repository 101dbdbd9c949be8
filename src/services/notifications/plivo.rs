//! Plivo SMS notification service.
//!
//! Sends plain text SMS through the Plivo Message API using HTTP basic auth.
//!
//! Plivo API Reference: https://www.plivo.com/docs/messaging/api/message/send-a-message

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use super::context::SendContext;
use super::deliver::{Deliver, compose_text, deliver_to_all};
use super::provider::Notifier;
use crate::error::{NotifyError, NotifyResult, VendorError};
use crate::external::client::{HTTP_CLIENT, ensure_success};

/// Default base URL of the Plivo API
pub const DEFAULT_PLIVO_ENDPOINT: &str = "https://api.plivo.com";

/// Environment fallbacks read when credentials are left empty
pub const AUTH_ID_ENV: &str = "PLIVO_AUTH_ID";
pub const AUTH_TOKEN_ENV: &str = "PLIVO_AUTH_TOKEN";

/// Plivo account credentials
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub auth_id: String,
    pub auth_token: String,
    /// Base URL override, defaults to `DEFAULT_PLIVO_ENDPOINT`
    pub endpoint: Option<String>,
}

/// Message settings shared by every receiver
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    /// Sender phone number or alphanumeric sender ID
    pub source: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    src: &'a str,
    dst: &'a str,
    text: &'a str,
}

/// HTTP client for the Plivo Message API
#[derive(Debug, Clone)]
pub struct PlivoClient {
    auth_id: String,
    auth_token: String,
    source: String,
    message_url: Url,
}

impl PlivoClient {
    /// Creates a client after checking the account credentials
    ///
    /// Empty `auth_id` / `auth_token` fall back to `PLIVO_AUTH_ID` /
    /// `PLIVO_AUTH_TOKEN`.
    pub fn new(client: ClientOptions, message: MessageOptions) -> NotifyResult<Self> {
        let auth_id = credential(client.auth_id, AUTH_ID_ENV, "plivo.auth_id")?;
        let auth_token = credential(client.auth_token, AUTH_TOKEN_ENV, "plivo.auth_token")?;

        if message.source.trim().is_empty() {
            return Err(NotifyError::configuration(
                "plivo.source",
                "Source number cannot be empty",
            ));
        }

        let endpoint = client
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_PLIVO_ENDPOINT);
        let message_url = message_url(endpoint, &auth_id)?;

        Ok(Self {
            auth_id,
            auth_token,
            source: message.source,
            message_url,
        })
    }

    pub fn message_url(&self) -> &Url {
        &self.message_url
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn credential(value: String, env_var: &str, key: &str) -> NotifyResult<String> {
    let value = if value.trim().is_empty() {
        std::env::var(env_var).unwrap_or_default()
    } else {
        value
    };

    if value.trim().is_empty() {
        return Err(NotifyError::configuration(
            key,
            format!("Value cannot be empty (set it explicitly or via {})", env_var),
        ));
    }

    Ok(value)
}

fn message_url(endpoint: &str, auth_id: &str) -> NotifyResult<Url> {
    let base = Url::parse(endpoint).map_err(|_| {
        NotifyError::configuration("plivo.endpoint", format!("Invalid URL format: {}", endpoint))
    })?;

    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(NotifyError::configuration(
            "plivo.endpoint",
            "URL must use http or https protocol",
        ));
    }

    let mut url = base;
    url.path_segments_mut()
        .map_err(|_| NotifyError::configuration("plivo.endpoint", "URL cannot be a base"))?
        .pop_if_empty()
        .extend(["v1", "Account", auth_id, "Message", ""]);

    Ok(url)
}

#[async_trait]
impl Deliver for PlivoClient {
    async fn deliver(&self, ctx: &SendContext, receiver: &str, text: &str) -> anyhow::Result<()> {
        let body = MessageRequest {
            src: &self.source,
            dst: receiver,
            text,
        };

        let mut request = HTTP_CLIENT
            .post(self.message_url.clone())
            .basic_auth(&self.auth_id, Some(&self.auth_token))
            .json(&body);

        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining);
        }

        let response = request.send().await.map_err(VendorError::from)?;
        ensure_success(response).await?;

        Ok(())
    }
}

/// Plivo notification service
///
/// # Example
/// ```ignore
/// let mut plivo = Plivo::new(
///     ClientOptions {
///         auth_id: "<auth-id>".to_string(),
///         auth_token: "<auth-token>".to_string(),
///         endpoint: None,
///     },
///     MessageOptions {
///         source: "<source-number>".to_string(),
///     },
/// )?;
/// plivo.add_receivers(["+14155550100"]);
/// ```
pub struct Plivo<C = PlivoClient> {
    client: C,
    receivers: Vec<String>,
}

impl Plivo<PlivoClient> {
    pub fn new(client: ClientOptions, message: MessageOptions) -> NotifyResult<Self> {
        Ok(Self::from_client(PlivoClient::new(client, message)?))
    }
}

impl<C: Deliver> Plivo<C> {
    /// Wraps any vendor client
    pub fn from_client(client: C) -> Self {
        Self {
            client,
            receivers: Vec::new(),
        }
    }

    /// Appends destination phone numbers to the receiver list
    ///
    /// Numbers are not validated here; Plivo rejects bad ones at send time.
    pub fn add_receivers<I, S>(&mut self, receivers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receivers.extend(receivers.into_iter().map(Into::into));
        self
    }

    pub fn receivers(&self) -> &[String] {
        &self.receivers
    }
}

#[async_trait]
impl<C: Deliver> Notifier for Plivo<C> {
    async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()> {
        let text = compose_text(subject, message);
        deliver_to_all(self.name(), &self.client, ctx, &self.receivers, &text).await
    }

    fn name(&self) -> &'static str {
        "plivo"
    }
}
