use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use http::{HeaderMap, Method};
use tracing::debug;

use crate::body::Body;
use crate::error::ClientError;
use crate::response::Response;

/// Fully-assembled request handed to the transport: everything except the URL,
/// which is passed alongside so the transport never recomputes it.
#[derive(Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Body,
    /// Basic-auth pair, used by token-exchange endpoints.
    pub basic_auth: Option<(String, String)>,
    /// Per-request timeout override.
    pub timeout: Option<Duration>,
}

impl Default for TransportRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: Body::Empty,
            basic_auth: None,
            timeout: None,
        }
    }
}

/// Capability interface for the HTTP transport.
///
/// The client never touches the network directly; it hands a URL and a
/// [`TransportRequest`] to this trait and returns whatever comes back. Tests
/// substitute a recording implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, url: &str, request: TransportRequest) -> Result<Response, ClientError>;
}

/// Production transport backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given default timeout
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, url: &str, request: TransportRequest) -> Result<Response, ClientError> {
        debug!(method = %request.method, url, "sending request");

        let mut req_builder = self.http_client.request(request.method, url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some((user, password)) = request.basic_auth {
            req_builder = req_builder.basic_auth(user, Some(password));
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = match request.body {
            Body::Empty => req_builder,
            Body::Bytes(bytes) => req_builder.body(bytes),
        };

        let resp = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(e.to_string())
            } else if e.is_connect() {
                ClientError::Connection(e.to_string())
            } else {
                ClientError::Transport(e)
            }
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();

        // Hand the body over as a live stream; buffering is the caller's choice.
        let stream = resp
            .bytes_stream()
            .map_err(|e| ClientError::Io(io::Error::new(io::ErrorKind::Other, e)));

        Ok(Response::new(status, headers, Box::pin(stream)))
    }
}
