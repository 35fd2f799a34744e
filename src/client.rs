use std::sync::Arc;
use std::time::Duration;

use http::{HeaderValue, Method};
use tracing::debug;

use crate::channel::Channel;
use crate::error::ClientError;
use crate::options::RequestOptions;
use crate::response::Response;
use crate::signer::{Consumer, HmacSha1Signer, OauthSigner, SignableRequest};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};

/// Configuration for [`Client`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whether channel resolution may fall back to `default_channel` when a
    /// call supplies none.
    pub use_default_channel: bool,
    /// The fallback channel. Defaults to the built-in AppDirect channel.
    pub default_channel: Channel,
    /// Timeout applied to the underlying HTTP client.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            use_default_channel: true,
            default_channel: Channel::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Set a custom timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `APPDIRECT_BASE_URL`, `APPDIRECT_TOKEN`, `APPDIRECT_CONSUMER_KEY`,
    /// and `APPDIRECT_CONSUMER_SECRET` into the default channel; anything
    /// unset keeps the built-in default.
    pub fn from_env() -> Self {
        let mut channel = Channel::default();
        if let Ok(base_url) = std::env::var("APPDIRECT_BASE_URL") {
            channel.base_url = base_url;
        }
        channel.token = std::env::var("APPDIRECT_TOKEN").ok();
        channel.consumer_key = std::env::var("APPDIRECT_CONSUMER_KEY").ok();
        channel.consumer_secret = std::env::var("APPDIRECT_CONSUMER_SECRET").ok();

        Self {
            default_channel: channel,
            ..Self::default()
        }
    }
}

/// AppDirect marketplace API client.
///
/// Holds two immutable values fixed at construction (the defaulting flag and
/// the default channel) plus the transport and signer capabilities; it is
/// otherwise stateless and safe to share across concurrent calls.
pub struct Client {
    use_default_channel: bool,
    default_channel: Channel,
    transport: Arc<dyn HttpTransport>,
    signer: Arc<dyn OauthSigner>,
}

impl Client {
    /// Create a client from configuration, wired to the production reqwest
    /// transport and HMAC-SHA1 signer.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_parts(config, transport, Arc::new(HmacSha1Signer)))
    }

    /// Create a client with explicit transport and signer implementations.
    /// This is the seam the tests use to observe dispatch without a network.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        signer: Arc<dyn OauthSigner>,
    ) -> Self {
        Self {
            use_default_channel: config.use_default_channel,
            default_channel: config.default_channel,
            transport,
            signer,
        }
    }

    /// Resolve the active channel for a call.
    ///
    /// A channel in the options wins and is returned as-is, without shape
    /// validation. Otherwise the default channel is returned, unless
    /// defaulting is disabled, in which case this fails synchronously.
    pub fn get_channel<'a>(
        &'a self,
        options: Option<&'a RequestOptions>,
    ) -> Result<&'a Channel, ClientError> {
        match options.and_then(|o| o.channel.as_ref()) {
            Some(channel) => Ok(channel),
            None => {
                if !self.use_default_channel {
                    return Err(ClientError::Config(
                        "either a channel must be provided or use_default_channel must be true"
                            .to_string(),
                    ));
                }
                Ok(&self.default_channel)
            }
        }
    }

    /// Issue a streaming request: raw body mode, response returned with a
    /// live byte stream. Stream-level errors propagate as the transport
    /// emits them.
    pub async fn stream(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.dispatch(path, options, false).await
    }

    /// Issue a buffered request in JSON mode.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        self.dispatch(path, options, true).await
    }

    /// Issue an OAuth1-signed request.
    ///
    /// The channel must carry both halves of the consumer pair. The signer's
    /// parameters are appended to the URL as a query string; the request is
    /// then dispatched in JSON mode. No bearer token is injected on this path.
    pub async fn oauth(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let channel = self.get_channel(Some(&options))?;
        let (Some(key), Some(secret)) = (
            channel.consumer_key.clone(),
            channel.consumer_secret.clone(),
        ) else {
            return Err(ClientError::MissingOauthCredentials);
        };
        let consumer = Consumer { key, secret };
        let mut url = format!("{}{}", channel.base_url, path);

        let method = options.method.clone().unwrap_or(Method::GET);
        let signable = SignableRequest {
            method: &method,
            url: &url,
            body: &options.body,
        };
        let oauth_params = self.signer.authorize(&consumer, &signable)?;

        let query = oauth_params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        append_oauth_query(&mut url, &query);

        let json = options.json.unwrap_or(true);
        let mut headers = options.headers;
        if json && !headers.contains_key(http::header::ACCEPT) {
            headers.insert(
                http::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            );
        }

        debug!(method = %method, url = %url, "dispatching OAuth1-signed request");

        let request = TransportRequest {
            method,
            headers,
            body: options.body,
            basic_auth: options.basic_auth,
            timeout: options.timeout,
        };
        self.transport.send(&url, request).await
    }

    /// Shared path for `stream` and `request`: resolve the channel, build the
    /// URL by direct concatenation, merge headers, inject the bearer token.
    async fn dispatch(
        &self,
        path: &str,
        options: RequestOptions,
        default_json: bool,
    ) -> Result<Response, ClientError> {
        let channel = self.get_channel(Some(&options))?;
        let url = format!("{}{}", channel.base_url, path);
        let token = channel.token.clone();

        let json = options.json.unwrap_or(default_json);
        let method = options.method.unwrap_or(Method::GET);
        let mut headers = options.headers;

        if json && !headers.contains_key(http::header::ACCEPT) {
            headers.insert(
                http::header::ACCEPT,
                HeaderValue::from_static("application/json"),
            );
        }

        // The channel token wins over a caller-supplied authorization header,
        // and is forwarded verbatim: no `Bearer ` prefix is added.
        if let Some(token) = token {
            let value = HeaderValue::from_str(&token)
                .map_err(|e| ClientError::Build(format!("invalid channel token: {}", e)))?;
            headers.insert(http::header::AUTHORIZATION, value);
        }

        debug!(method = %method, url = %url, json, "dispatching request");

        let request = TransportRequest {
            method,
            headers,
            body: options.body,
            basic_auth: options.basic_auth,
            timeout: options.timeout,
        };
        self.transport.send(&url, request).await
    }
}

/// Append an OAuth1 query string to a URL.
///
/// Uses `&` when the URL contains a `?` at an index greater than zero, `?`
/// otherwise. A `?` at index 0 is treated as "no query string" — inherited
/// behavior, pinned by a test below rather than corrected.
fn append_oauth_query(url: &mut String, query: &str) {
    if url.find('?').is_some_and(|pos| pos > 0) {
        url.push('&');
    } else {
        url.push('?');
    }
    url.push_str(query);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(config: ClientConfig) -> Client {
        // get_channel is pure selection; the capabilities are never touched.
        Client::with_parts(
            config,
            Arc::new(PanicTransport),
            Arc::new(HmacSha1Signer),
        )
    }

    struct PanicTransport;

    #[async_trait::async_trait]
    impl HttpTransport for PanicTransport {
        async fn send(
            &self,
            _url: &str,
            _request: TransportRequest,
        ) -> Result<Response, ClientError> {
            panic!("transport must not be reached");
        }
    }

    #[test]
    fn test_get_channel_returns_default() {
        let client = client_with(ClientConfig::default());
        let channel = client.get_channel(None).unwrap();
        assert_eq!(channel, &Channel::default());
    }

    #[test]
    fn test_get_channel_is_identity_preserving() {
        let client = client_with(ClientConfig::default());
        let options = RequestOptions::with_channel(Channel {
            name: "test".to_string(),
            base_url: "https://test.appdirect.com".to_string(),
            ..Channel::default()
        });

        let resolved = client.get_channel(Some(&options)).unwrap();
        assert!(std::ptr::eq(resolved, options.channel.as_ref().unwrap()));
    }

    #[test]
    fn test_get_channel_fails_when_defaulting_disabled() {
        let client = client_with(ClientConfig {
            use_default_channel: false,
            ..ClientConfig::default()
        });

        let err = client.get_channel(None).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_get_channel_supplied_channel_wins_over_disabled_default() {
        let client = client_with(ClientConfig {
            use_default_channel: false,
            ..ClientConfig::default()
        });
        let options = RequestOptions::with_channel(Channel::default());
        assert!(client.get_channel(Some(&options)).is_ok());
    }

    #[test]
    fn test_append_query_without_existing_query() {
        let mut url = "https://x.test/p".to_string();
        append_oauth_query(&mut url, "oauth_nonce=n");
        assert_eq!(url, "https://x.test/p?oauth_nonce=n");
    }

    #[test]
    fn test_append_query_with_existing_query() {
        let mut url = "https://x.test/p?a=1".to_string();
        append_oauth_query(&mut url, "oauth_nonce=n");
        assert_eq!(url, "https://x.test/p?a=1&oauth_nonce=n");
    }

    #[test]
    fn test_append_query_question_mark_at_index_zero() {
        // A URL whose only '?' sits at index 0 is treated as having no query
        // string, so a second '?' is appended. Inherited behavior, kept as-is.
        let mut url = "?a=1".to_string();
        append_oauth_query(&mut url, "oauth_nonce=n");
        assert_eq!(url, "?a=1?oauth_nonce=n");
    }
}
