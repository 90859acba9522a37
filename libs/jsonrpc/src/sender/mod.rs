use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::error::Result;

pub mod http;

pub use self::http::HttpSender;

/// Sender trait for performing a single JSON-RPC round trip
///
/// Takes the resolved endpoint, the serialized envelope, and the request
/// headers, and resolves to the parsed JSON response body. This is the one
/// designed seam of the transport: substitute an implementor at client
/// construction to route calls through a different networking stack.
#[async_trait::async_trait]
pub trait Sender: Send + Sync {
    /// Send the envelope and parse the response body as JSON
    async fn send(&self, url: &Url, data: &Value, headers: &HeaderMap) -> Result<Value>;
}

#[async_trait::async_trait]
impl Sender for Box<dyn Sender> {
    async fn send(&self, url: &Url, data: &Value, headers: &HeaderMap) -> Result<Value> {
        (**self).send(url, data, headers).await
    }
}
