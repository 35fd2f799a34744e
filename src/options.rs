use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

use crate::body::Body;
use crate::channel::Channel;
use crate::error::ClientError;

/// Per-call options: an optional channel override plus the transport knobs.
///
/// Caller-supplied values win over the per-mode defaults for any overlapping
/// key; the computed URL is the one thing a caller cannot override.
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Channel to use for this call instead of the client's default.
    pub channel: Option<Channel>,
    /// HTTP method; `GET` when unset.
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Body,
    /// Override the mode's JSON default (`stream` = raw, `request`/`oauth` = JSON).
    pub json: Option<bool>,
    /// Basic-auth pair, used by token-exchange endpoints.
    pub basic_auth: Option<(String, String)>,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create an options builder
    pub fn builder() -> RequestOptionsBuilder {
        RequestOptionsBuilder::default()
    }

    /// Options carrying only a channel override
    pub fn with_channel(channel: Channel) -> Self {
        Self {
            channel: Some(channel),
            ..Self::default()
        }
    }
}

impl From<Channel> for RequestOptions {
    fn from(channel: Channel) -> Self {
        RequestOptions::with_channel(channel)
    }
}

/// Builder for [`RequestOptions`] with a fluent API
#[derive(Debug, Default)]
pub struct RequestOptionsBuilder {
    options: RequestOptions,
}

impl RequestOptionsBuilder {
    /// Set the channel for this call
    pub fn channel(mut self, channel: Channel) -> Self {
        self.options.channel = Some(channel);
        self
    }

    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.options.method = Some(method);
        self
    }

    /// Add a header
    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self, ClientError>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Display,
        V::Error: std::fmt::Display,
    {
        let key = key
            .try_into()
            .map_err(|e| ClientError::Build(format!("invalid header name: {}", e)))?;
        let value = value
            .try_into()
            .map_err(|e| ClientError::Build(format!("invalid header value: {}", e)))?;
        self.options.headers.insert(key, value);
        Ok(self)
    }

    /// Set the body to a JSON-serialized value and add a Content-Type header
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, ClientError> {
        self.options.body = Body::from_json(value)?;
        self.options.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }

    /// Set the request body
    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.options.body = body.into();
        self
    }

    /// Override the mode's JSON default
    pub fn json_mode(mut self, enabled: bool) -> Self {
        self.options.json = Some(enabled);
        self
    }

    /// Set basic-auth credentials
    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.options.basic_auth = Some((user.into(), password.into()));
        self
    }

    /// Set a per-request timeout
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.options.timeout = Some(duration);
        self
    }

    /// Build the options
    pub fn build(self) -> RequestOptions {
        self.options
    }
}
