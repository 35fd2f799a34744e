use std::io;

use thiserror::Error;

/// Error type for all client operations.
///
/// The source system surfaced failures through three unrelated channels
/// (synchronous throws, string rejections, transport objects); here they are
/// unified into one tagged enum. `Signing` deliberately carries only the
/// message string of the underlying failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No channel was supplied and falling back to the default is disabled.
    #[error("channel configuration error: {0}")]
    Config(String),

    /// A signed request was attempted on a channel without a full OAuth1
    /// consumer pair. The message is kept verbatim from the original API.
    #[error("Missing required parameters options.channel.consumerKey or options.channel.consumerSecret")]
    MissingOauthCredentials,

    /// Signer construction or signing failed.
    #[error("{0}")]
    Signing(String),

    /// Request assembly failed (invalid header value, client build error).
    #[error("request build error: {0}")]
    Build(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// Anything else the transport raises, passed through unclassified.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}
