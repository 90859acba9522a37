use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use url::Url;

use crate::config::JsonrpcConfig;
use crate::error::{Error, Result};
use crate::sender::{HttpSender, Sender};

/// JSON-RPC envelope client
///
/// Turns a `(method, params)` pair into a network call and a network response
/// into either the call's result value or an error. The endpoint URL is
/// resolved once at construction and immutable thereafter; request ids are a
/// per-client strictly increasing sequence starting at 1.
pub struct JsonrpcClient {
    url: Url,
    version: String,
    sender: Box<dyn Sender>,
    sequence: AtomicU64,
}

impl JsonrpcClient {
    /// Create a client with the default HTTP sender
    pub fn new(config: JsonrpcConfig) -> Result<Self> {
        Self::with_sender(config, HttpSender::new())
    }

    /// Create a client with a custom sender
    pub fn with_sender(config: JsonrpcConfig, sender: impl Sender + 'static) -> Result<Self> {
        Ok(Self {
            url: config.endpoint()?,
            version: config.version_string().to_string(),
            sender: Box::new(sender),
            sequence: AtomicU64::new(0),
        })
    }

    /// The resolved endpoint URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Perform one JSON-RPC round trip
    ///
    /// Returns the `result` field verbatim when the key is present (including
    /// falsy values), the raw body when neither `result` nor `error` is
    /// present, and fails with [`Error::RemoteCall`] when `error` is present.
    pub async fn execute(&self, method: &str, params: Value) -> Result<Value> {
        let data = json!({
            "jsonrpc": self.version,
            "method": method,
            "params": params,
            "id": self.next_sequence(),
        });

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut response = self.sender.send(&self.url, &data, &headers).await?;

        if let Some(error) = response.get("error") {
            tracing::error!(method, %error, "remote call returned an error");
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(Error::RemoteCall(message.to_string()));
        }

        match response.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Ok(response),
        }
    }
}
