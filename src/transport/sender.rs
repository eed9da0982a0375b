//! Rate-limited HTTP sender for eBay API calls.
//!
//! This module provides the [`Transport`] type. One transport is meant to be
//! shared by every client and request in the process so that unrelated
//! account handles still draw from a single call quota.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::error::ConfigError;
use crate::transport::errors::HttpError;
use crate::transport::rate_limiter::{RateLimitConfig, RateLimiter};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

static SHARED: OnceLock<Arc<Transport>> = OnceLock::new();

/// Settings for a [`Transport`].
///
/// # Defaults
///
/// - `rate_limit`: 5000 calls per day
/// - `timeout`: `None` (the HTTP client's own behaviour)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Ceiling applied to every call sent through the transport.
    pub rate_limit: RateLimitConfig,
    /// Per-call deadline enforced by the HTTP client.
    pub timeout: Option<Duration>,
}

/// A rate-limited HTTP sender.
///
/// The transport handles:
/// - Queueing calls through its [`RateLimiter`]
/// - Default headers (`Content-Type`, `User-Agent`)
/// - Turning non-2xx replies into [`HttpError::Response`]
///
/// It does not retry; network errors propagate to the caller unchanged.
///
/// # Thread Safety
///
/// `Transport` is `Send + Sync` and is normally held behind an [`Arc`].
///
/// # Example
///
/// ```rust,ignore
/// use std::collections::HashMap;
/// use ebay_trading::transport::Transport;
///
/// let transport = Transport::shared();
/// let body = transport
///     .send("https://api.ebay.com/ws/api.dll", &HashMap::new(), xml)
///     .await?;
/// ```
#[derive(Debug)]
pub struct Transport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Queue shared by every call sent through this transport.
    limiter: RateLimiter,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify Transport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Transport>();
};

impl Transport {
    /// Creates a new transport with its own rate limiter.
    ///
    /// Most applications should use [`Transport::shared`] instead; a private
    /// transport does not share its quota with anything else.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: TransportConfig) -> Self {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        let mut default_headers = HashMap::new();
        default_headers.insert("Content-Type".to_string(), "text/xml".to_string());
        default_headers.insert(
            "User-Agent".to_string(),
            format!("eBay Trading Library v{SDK_VERSION} | Rust"),
        );

        Self {
            client,
            limiter: RateLimiter::new(config.rate_limit),
            default_headers,
        }
    }

    /// Returns the process-wide transport, creating it with defaults on first use.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new(TransportConfig::default()))))
    }

    /// Configures the process-wide transport.
    ///
    /// Call this once at startup, before any request runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportAlreadyInstalled`] if the shared
    /// transport already exists.
    pub fn install(config: TransportConfig) -> Result<Arc<Self>, ConfigError> {
        let transport = Arc::new(Self::new(config));
        SHARED
            .set(Arc::clone(&transport))
            .map_err(|_| ConfigError::TransportAlreadyInstalled)?;
        Ok(transport)
    }

    /// Returns the rate limiter guarding this transport.
    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Returns the default headers sent with every call.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// POSTs `body` to `endpoint` once a rate-limit slot is free.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] for connection failures and timeouts,
    /// and [`HttpError::Response`] for non-2xx replies.
    pub async fn send(
        &self,
        endpoint: &str,
        headers: &HashMap<String, String>,
        body: String,
    ) -> Result<String, HttpError> {
        self.limiter.acquire().await;

        let call = headers
            .get("X-EBAY-API-CALL-NAME")
            .map_or("<none>", String::as_str);
        tracing::debug!("Sending {} to {}", call, endpoint);

        let mut req_builder = self.client.post(endpoint);
        for (key, value) in self.default_headers.iter().chain(headers) {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.body(body).send().await?;
        let code = res.status().as_u16();
        let text = res.text().await?;

        if !(200..=299).contains(&code) {
            return Err(HttpError::Response { code, body: text });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_headers() {
        let transport = Transport::new(TransportConfig::default());

        assert_eq!(
            transport.default_headers().get("Content-Type"),
            Some(&"text/xml".to_string())
        );
        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("eBay Trading Library v"));
    }

    #[test]
    fn test_shared_transport_is_one_instance() {
        let first = Transport::shared();
        let second = Transport::shared();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            Transport::install(TransportConfig::default()),
            Err(ConfigError::TransportAlreadyInstalled)
        ));
    }

    #[tokio::test]
    async fn test_send_posts_body_with_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ws/api.dll"))
            .and(header("X-EBAY-API-CALL-NAME", "GetItem"))
            .and(header("Content-Type", "text/xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = Transport::new(TransportConfig::default());
        let mut headers = HashMap::new();
        headers.insert("X-EBAY-API-CALL-NAME".to_string(), "GetItem".to_string());

        let body = transport
            .send(
                &format!("{}/ws/api.dll", mock_server.uri()),
                &headers,
                "<GetItemRequest/>".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(body, "<ok/>");
        assert_eq!(transport.limiter().in_window().await, 1);
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_response_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&mock_server)
            .await;

        let transport = Transport::new(TransportConfig::default());
        let result = transport
            .send(&mock_server.uri(), &HashMap::new(), String::new())
            .await;

        assert!(matches!(
            result,
            Err(HttpError::Response { code: 503, ref body }) if body == "down"
        ));
    }
}
