use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::sender::Sender;

/// Default HTTP sender
///
/// POSTs the JSON-serialized envelope and parses the response body as JSON.
/// Exactly one round trip per call: no retry, no timeout, no backoff.
#[derive(Debug, Clone, Default)]
pub struct HttpSender {
    client: reqwest::Client,
}

impl HttpSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Sender for HttpSender {
    async fn send(&self, url: &Url, data: &Value, headers: &HeaderMap) -> Result<Value> {
        let response = self
            .client
            .post(url.clone())
            .headers(headers.clone())
            .json(data)
            .send()
            .await?;

        Ok(response.json().await?)
    }
}
