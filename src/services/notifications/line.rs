//! LINE notification service.
//!
//! Pushes plain text messages to LINE users, groups or rooms through the
//! Messaging API push endpoint. Uses the global `HTTP_CLIENT` for connection
//! pooling.
//!
//! LINE API Reference: https://developers.line.biz/en/reference/messaging-api/#send-push-message

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use super::context::SendContext;
use super::deliver::{Deliver, compose_text, deliver_to_all};
use super::provider::Notifier;
use crate::error::{NotifyError, NotifyResult, VendorError};
use crate::external::client::{HTTP_CLIENT, ensure_success};

/// Default base URL of the LINE Messaging API
pub const DEFAULT_LINE_ENDPOINT: &str = "https://api.line.me";

const PUSH_PATH: &str = "v2/bot/message/push";

/// Optional LINE client settings
#[derive(Debug, Clone)]
pub struct LineOptions {
    /// Base URL of the Messaging API
    pub endpoint: String,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LINE_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// HTTP client for the LINE Messaging API push endpoint
#[derive(Debug, Clone)]
pub struct LineClient {
    channel_access_token: String,
    push_url: Url,
}

impl LineClient {
    /// Creates a client after checking the channel credentials
    ///
    /// # Arguments
    /// * `channel_secret` - Channel secret from the LINE developers console
    /// * `channel_access_token` - Long-lived channel access token
    /// * `options` - Endpoint override
    pub fn new(
        channel_secret: &str,
        channel_access_token: &str,
        options: LineOptions,
    ) -> NotifyResult<Self> {
        if channel_secret.trim().is_empty() {
            return Err(NotifyError::configuration(
                "line.channel_secret",
                "Channel secret cannot be empty",
            ));
        }

        if channel_access_token.trim().is_empty() {
            return Err(NotifyError::configuration(
                "line.channel_access_token",
                "Channel access token cannot be empty",
            ));
        }

        Ok(Self {
            channel_access_token: channel_access_token.to_string(),
            push_url: push_url(&options.endpoint)?,
        })
    }

    pub fn push_url(&self) -> &Url {
        &self.push_url
    }
}

fn push_url(endpoint: &str) -> NotifyResult<Url> {
    let base = Url::parse(endpoint).map_err(|_| {
        NotifyError::configuration("line.endpoint", format!("Invalid URL format: {}", endpoint))
    })?;

    if base.scheme() != "https" && base.scheme() != "http" {
        return Err(NotifyError::configuration(
            "line.endpoint",
            "URL must use http or https protocol",
        ));
    }

    let base = format!("{}/", base.as_str().trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join(PUSH_PATH))
        .map_err(|e| NotifyError::configuration("line.endpoint", e.to_string()))
}

#[async_trait]
impl Deliver for LineClient {
    async fn deliver(&self, ctx: &SendContext, receiver: &str, text: &str) -> anyhow::Result<()> {
        let body = PushRequest {
            to: receiver,
            messages: [TextMessage { kind: "text", text }],
        };

        let mut request = HTTP_CLIENT
            .post(self.push_url.clone())
            .bearer_auth(&self.channel_access_token)
            .json(&body);

        if let Some(remaining) = ctx.remaining() {
            request = request.timeout(remaining);
        }

        let response = request.send().await.map_err(VendorError::from)?;
        ensure_success(response).await?;

        Ok(())
    }
}

/// LINE notification service
///
/// Holds a vendor client and the user, group or room IDs to push to.
///
/// # Example
/// ```ignore
/// let mut line = Line::new("<channel-secret>", "<channel-access-token>")?;
/// line.add_receivers(["U4af4980629...", "C1234567890..."]);
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.use_service(line);
/// dispatcher.send(&SendContext::new(), "subject", "message").await?;
/// ```
pub struct Line<C = LineClient> {
    client: C,
    receivers: Vec<String>,
}

impl Line<LineClient> {
    /// Creates a LINE service talking to the public Messaging API
    pub fn new(channel_secret: &str, channel_access_token: &str) -> NotifyResult<Self> {
        Self::with_options(channel_secret, channel_access_token, LineOptions::default())
    }

    /// Creates a LINE service with a custom endpoint
    pub fn with_options(
        channel_secret: &str,
        channel_access_token: &str,
        options: LineOptions,
    ) -> NotifyResult<Self> {
        let client = LineClient::new(channel_secret, channel_access_token, options)?;
        Ok(Self::from_client(client))
    }
}

impl<C: Deliver> Line<C> {
    /// Wraps any vendor client, e.g. a proxy or an in-memory fake
    pub fn from_client(client: C) -> Self {
        Self {
            client,
            receivers: Vec::new(),
        }
    }

    /// Appends user, group or room IDs to the receiver list
    ///
    /// No deduplication: an ID added twice receives the message twice.
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
impl<C: Deliver> Notifier for Line<C> {
    /// Pushes one text message per receiver, in registration order
    ///
    /// Subject is on the first line followed by the message on the next.
    /// Stops at the first receiver LINE rejects.
    async fn send(&self, ctx: &SendContext, subject: &str, message: &str) -> NotifyResult<()> {
        let text = compose_text(subject, message);
        deliver_to_all(self.name(), &self.client, ctx, &self.receivers, &text).await
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::deliver::testing::RecordingClient;
    use proptest::prelude::*;

    #[test]
    fn test_new_rejects_empty_secret() {
        let err = Line::new("", "token").err().expect("empty secret must fail");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("line.channel_secret"));
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let err = Line::new("secret", "  ").err().expect("empty token must fail");
        assert!(err.to_string().contains("line.channel_access_token"));
    }

    #[test]
    fn test_push_url_default() {
        let client = LineClient::new("secret", "token", LineOptions::default()).unwrap();
        assert_eq!(
            client.push_url().as_str(),
            "https://api.line.me/v2/bot/message/push"
        );
    }

    #[test]
    fn test_push_url_custom_endpoint_with_path() {
        let options = LineOptions {
            endpoint: "http://localhost:8080/line/".to_string(),
        };
        let client = LineClient::new("secret", "token", options).unwrap();
        assert_eq!(
            client.push_url().as_str(),
            "http://localhost:8080/line/v2/bot/message/push"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let options = LineOptions {
            endpoint: "not-a-url".to_string(),
        };
        assert!(Line::with_options("secret", "token", options).is_err());

        let options = LineOptions {
            endpoint: "ftp://api.line.me".to_string(),
        };
        assert!(Line::with_options("secret", "token", options).is_err());
    }

    #[test]
    fn test_push_request_body() {
        let body = PushRequest {
            to: "U123",
            messages: [TextMessage {
                kind: "text",
                text: "Subject\nBody",
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["to"], "U123");
        assert_eq!(json["messages"][0]["type"], "text");
        assert_eq!(json["messages"][0]["text"], "Subject\nBody");
    }

    #[tokio::test]
    async fn test_send_without_receivers_skips_client() {
        let client = RecordingClient::new();
        let line = Line::from_client(client.clone());

        line.send(&SendContext::new(), "s", "m").await.unwrap();

        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_composes_subject_and_message() {
        let client = RecordingClient::new();
        let mut line = Line::from_client(client.clone());
        line.add_receivers(["U1", "G2", "R3"]);

        line.send(&SendContext::new(), "Deploy", "finished").await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(client.receivers(), vec!["U1", "G2", "R3"]);
        assert!(calls.iter().all(|(_, text)| text == "Deploy\nfinished"));
    }

    #[tokio::test]
    async fn test_send_fails_fast() {
        let client = RecordingClient::failing_on(2);
        let mut line = Line::from_client(client.clone());
        line.add_receivers(["U1", "U2", "U3"]);

        let err = line.send(&SendContext::new(), "s", "m").await.unwrap_err();

        assert!(err.is_delivery());
        assert_eq!(err.receiver(), Some("U2"));
        assert!(err.to_string().contains("line"));
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_send_with_cancelled_context() {
        let client = RecordingClient::new();
        let mut line = Line::from_client(client.clone());
        line.add_receivers(["U1"]);

        let ctx = SendContext::new();
        ctx.cancel();

        let err = line.send(&ctx, "s", "m").await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_receivers_are_delivered_twice() {
        let client = RecordingClient::new();
        let mut line = Line::from_client(client.clone());
        line.add_receivers(["U1"]);
        line.add_receivers(["U1"]);

        line.send(&SendContext::new(), "s", "m").await.unwrap();

        assert_eq!(client.receivers(), vec!["U1", "U1"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Every receiver is contacted exactly once, in order, with the same text
        #[test]
        fn prop_send_contacts_each_receiver_once(
            receivers in proptest::collection::vec("[A-Za-z0-9]{1,12}", 0..16),
            subject in ".{0,20}",
            message in ".{0,40}",
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let client = RecordingClient::new();
            let mut line = Line::from_client(client.clone());
            line.add_receivers(receivers.clone());

            runtime.block_on(line.send(&SendContext::new(), &subject, &message)).unwrap();

            prop_assert_eq!(client.receivers(), receivers);
            let expected = format!("{}\n{}", subject, message);
            prop_assert!(client.calls().iter().all(|(_, text)| *text == expected));
        }
    }
}
