use std::sync::LazyLock;
use std::time::Duration;

use crate::error::VendorError;

/// User-Agent sent with every vendor request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client instance shared by every vendor client
///
/// This client is initialized lazily on first access and reused across the application.
///
/// # Benefits
/// - **Connection pooling**: Reuses TCP connections for better performance
/// - **DNS caching**: Reduces DNS lookup overhead
/// - **Memory efficiency**: Single client instance for the entire application
///
/// # Features
/// - **Compression**: Supports gzip response bodies
/// - **HTTP/2**: Adaptive window sizing and keep-alive
/// - **Timeouts**: 30s request timeout, 10s connect timeout; a send deadline
///   shortens the per-request timeout
/// - **Security**: Uses Rustls for TLS (no OpenSSL dependency)
///
/// # Example
/// ```ignore
/// use crate::external::client::HTTP_CLIENT;
///
/// async fn push(url: &str, token: &str) -> Result<(), reqwest::Error> {
///     HTTP_CLIENT
///         .post(url)
///         .bearer_auth(token)
///         .send()
///         .await?
///         .error_for_status()?;
///     Ok(())
/// }
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
});

/// Turns a non-2xx vendor response into `VendorError::Api`
///
/// Both LINE and Plivo report failures as JSON with a message field
/// (`message` and `error` respectively); the raw body is used otherwise.
pub async fn ensure_success(response: reqwest::Response) -> Result<(), VendorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(VendorError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

fn extract_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|json| json.get("message").or_else(|| json.get("error")))
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
