//! AppDirect Marketplace API Client
//!
//! Thin client for the AppDirect marketplace API. Requests are scoped by a
//! *channel* (base URL plus credentials), which is either supplied per call or
//! taken from the client's built-in default, and dispatched in one of three
//! modes:
//!
//! - streaming read with a raw body
//! - buffered request in JSON mode
//! - OAuth1-signed request with the signature carried as query parameters
//!
//! HTTP transport and OAuth1 signing sit behind capability traits
//! ([`HttpTransport`], [`OauthSigner`]) so the channel and dispatch logic is
//! testable without network access.
//!
//! # Examples
//!
//! ## Buffered JSON Request
//!
//! ```no_run
//! use appdirect_client::{Client, ClientConfig, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_config(ClientConfig::default())?;
//!
//! let response = client
//!     .request("/api/marketplace/v1/listing?count=1", RequestOptions::default())
//!     .await?;
//! let products: serde_json::Value = response.json().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming
//!
//! ```no_run
//! use appdirect_client::{Client, ClientConfig, RequestOptions};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_config(ClientConfig::default())?;
//!
//! let response = client
//!     .stream("/api/marketplace/v1/listing", RequestOptions::default())
//!     .await?;
//! let mut stream = response.into_stream();
//!
//! while let Some(chunk) = stream.next().await {
//!     let chunk = chunk?;
//!     println!("{} bytes", chunk.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## OAuth1-Signed Request
//!
//! ```no_run
//! use appdirect_client::{Channel, Client, ClientConfig, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = Channel {
//!     base_url: "https://test.appdirect.com".to_string(),
//!     consumer_key: Some("key".to_string()),
//!     consumer_secret: Some("secret".to_string()),
//!     ..Channel::default()
//! };
//!
//! let client = Client::from_config(ClientConfig::default())?;
//! let response = client
//!     .oauth(
//!         "/api/channel/v1/applications?size=1",
//!         RequestOptions::with_channel(channel),
//!     )
//!     .await?;
//! let applications: serde_json::Value = response.json().await?;
//! # Ok(())
//! # }
//! ```

mod body;
mod channel;
mod client;
mod error;
mod options;
mod response;
mod signer;
mod transport;

// Re-export public API
pub use body::{Body, BoxStream};
pub use channel::Channel;
pub use client::{Client, ClientConfig};
pub use error::ClientError;
pub use options::{RequestOptions, RequestOptionsBuilder};
pub use response::Response;
pub use signer::{Consumer, HmacSha1Signer, OauthSigner, SignableRequest};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest};

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
