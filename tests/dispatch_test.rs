//! Dispatch-logic tests against stub capabilities: no network, no real
//! signing. These observe exactly what the client hands to the transport.

use std::sync::{Arc, Mutex};

use appdirect_client::{
    Channel, Client, ClientConfig, ClientError, Consumer, HttpTransport, Method, OauthSigner,
    RequestOptions, Response, SignableRequest, StatusCode, TransportRequest,
};
use bytes::Bytes;
use http::HeaderMap;

struct RecordedCall {
    url: String,
    method: Method,
    headers: HeaderMap,
    basic_auth: Option<(String, String)>,
}

#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    fn single_call(&self) -> RecordedCall {
        let mut calls = self.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        calls.remove(0)
    }
}

#[async_trait::async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, url: &str, request: TransportRequest) -> Result<Response, ClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            method: request.method,
            headers: request.headers,
            basic_auth: request.basic_auth,
        });
        Ok(Response::from_bytes(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(b"{}"),
        ))
    }
}

/// Returns a fixed parameter list in insertion order.
struct StubSigner;

impl OauthSigner for StubSigner {
    fn authorize(
        &self,
        _consumer: &Consumer,
        _request: &SignableRequest<'_>,
    ) -> Result<Vec<(String, String)>, ClientError> {
        Ok(vec![
            ("oauth_consumer_key".to_string(), "k".to_string()),
            ("oauth_signature".to_string(), "stub-signature".to_string()),
        ])
    }
}

/// Always fails, for the signing-error path.
struct FailingSigner;

impl OauthSigner for FailingSigner {
    fn authorize(
        &self,
        _consumer: &Consumer,
        _request: &SignableRequest<'_>,
    ) -> Result<Vec<(String, String)>, ClientError> {
        Err(ClientError::Signing("signer exploded".to_string()))
    }
}

fn stub_client(config: ClientConfig) -> (Client, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_parts(config, transport.clone(), Arc::new(StubSigner));
    (client, transport)
}

fn oauth_channel() -> Channel {
    Channel {
        base_url: "https://t".to_string(),
        consumer_key: Some("k".to_string()),
        consumer_secret: Some("s".to_string()),
        ..Channel::default()
    }
}

#[tokio::test]
async fn test_request_without_token_sends_no_authorization() {
    let (client, transport) = stub_client(ClientConfig::default());
    let channel = Channel {
        base_url: "https://t".to_string(),
        ..Channel::default()
    };

    client
        .request("/path", RequestOptions::with_channel(channel))
        .await
        .unwrap();

    let call = transport.single_call();
    assert_eq!(call.url, "https://t/path");
    assert!(!call.headers.contains_key(http::header::AUTHORIZATION));
}

#[tokio::test]
async fn test_channel_token_wins_over_caller_header() {
    let (client, transport) = stub_client(ClientConfig::default());
    let channel = Channel {
        base_url: "https://t".to_string(),
        token: Some("channel-token".to_string()),
        ..Channel::default()
    };

    let options = RequestOptions::builder()
        .channel(channel)
        .header("authorization", "caller-token")
        .unwrap()
        .build();

    client.request("/path", options).await.unwrap();

    let call = transport.single_call();
    assert_eq!(
        call.headers.get(http::header::AUTHORIZATION).unwrap(),
        "channel-token"
    );
}

#[tokio::test]
async fn test_request_mode_adds_json_accept_header() {
    let (client, transport) = stub_client(ClientConfig::default());

    client
        .request("/path", RequestOptions::default())
        .await
        .unwrap();

    let call = transport.single_call();
    assert_eq!(call.url, "https://www.appdirect.com/path");
    assert_eq!(
        call.headers.get(http::header::ACCEPT).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_stream_mode_defaults_to_raw() {
    let (client, transport) = stub_client(ClientConfig::default());

    client
        .stream("/path", RequestOptions::default())
        .await
        .unwrap();

    let call = transport.single_call();
    assert!(!call.headers.contains_key(http::header::ACCEPT));
}

#[tokio::test]
async fn test_stream_fails_without_resolvable_channel() {
    let (client, transport) = stub_client(ClientConfig {
        use_default_channel: false,
        ..ClientConfig::default()
    });

    let err = client
        .stream("/path", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Config(_)));
    assert!(transport.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oauth_appends_signer_parameters_in_order() {
    let (client, transport) = stub_client(ClientConfig::default());

    client
        .oauth("/api/x", RequestOptions::with_channel(oauth_channel()))
        .await
        .unwrap();

    let call = transport.single_call();
    assert!(call.url.starts_with("https://t/api/x?"));
    assert_eq!(
        call.url,
        "https://t/api/x?oauth_consumer_key=k&oauth_signature=stub-signature"
    );
    assert_eq!(call.method, Method::GET);
}

#[tokio::test]
async fn test_oauth_uses_ampersand_when_query_present() {
    let (client, transport) = stub_client(ClientConfig::default());

    client
        .oauth("/p?a=1", RequestOptions::with_channel(oauth_channel()))
        .await
        .unwrap();

    let call = transport.single_call();
    assert_eq!(
        call.url,
        "https://t/p?a=1&oauth_consumer_key=k&oauth_signature=stub-signature"
    );
}

#[tokio::test]
async fn test_oauth_method_override() {
    let (client, transport) = stub_client(ClientConfig::default());

    let options = RequestOptions::builder()
        .channel(oauth_channel())
        .method(Method::POST)
        .build();

    client.oauth("/api/x", options).await.unwrap();

    let call = transport.single_call();
    assert_eq!(call.method, Method::POST);
}

#[tokio::test]
async fn test_oauth_does_not_inject_bearer_token() {
    let (client, transport) = stub_client(ClientConfig::default());
    let channel = Channel {
        token: Some("should-not-appear".to_string()),
        ..oauth_channel()
    };

    client
        .oauth("/api/x", RequestOptions::with_channel(channel))
        .await
        .unwrap();

    let call = transport.single_call();
    assert!(!call.headers.contains_key(http::header::AUTHORIZATION));
}

#[tokio::test]
async fn test_oauth_surfaces_signing_error_message() {
    let transport = Arc::new(RecordingTransport::default());
    let client = Client::with_parts(
        ClientConfig::default(),
        transport.clone(),
        Arc::new(FailingSigner),
    );

    let err = client
        .oauth("/api/x", RequestOptions::with_channel(oauth_channel()))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "signer exploded");
    assert!(transport.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_basic_auth_reaches_transport() {
    let (client, transport) = stub_client(ClientConfig::default());

    let options = RequestOptions::builder()
        .basic_auth("user", "pass")
        .build();

    client.request("/oauth/token", options).await.unwrap();

    let call = transport.single_call();
    assert_eq!(
        call.basic_auth,
        Some(("user".to_string(), "pass".to_string()))
    );
}
