use serde::{Deserialize, Serialize};

/// A named marketplace endpoint configuration: base URL plus credentials.
///
/// A channel is either the client's immutable default or a plain value passed
/// per call; nothing is cached across calls. `name` and `partner` are opaque,
/// informational identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub name: String,
    pub partner: String,
    /// Absolute URL prefix. Request paths are concatenated directly, so a
    /// trailing slash here produces a double slash on the wire.
    pub base_url: String,
    /// Bearer credential, forwarded verbatim as the `authorization` header.
    pub token: Option<String>,
    /// OAuth1 consumer pair. Both halves are required for signed requests;
    /// one without the other is rejected by [`crate::Client::oauth`].
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
}

/// The built-in AppDirect production channel, used when the caller supplies
/// none and defaulting is enabled.
impl Default for Channel {
    fn default() -> Self {
        Self {
            name: "appdirect".to_string(),
            partner: "APPDIRECT".to_string(),
            base_url: "https://www.appdirect.com".to_string(),
            token: None,
            consumer_key: None,
            consumer_secret: None,
        }
    }
}
