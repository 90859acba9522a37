use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Endpoint configuration for a [`JsonrpcClient`](crate::JsonrpcClient)
///
/// Either an absolute `url`, or a (scheme, hostname, port, pathname) tuple.
/// An explicit `url` always wins over host/port/path synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonrpcConfig {
    url: Option<String>,
    hostname: String,
    port: Option<u16>,
    pathname: Option<String>,
    jsonrpc_version: String,
    unsecure: bool,
}

impl Default for JsonrpcConfig {
    fn default() -> Self {
        Self {
            url: None,
            hostname: "localhost".to_string(),
            port: None,
            pathname: None,
            jsonrpc_version: "2.0".to_string(),
            unsecure: false,
        }
    }
}

impl JsonrpcConfig {
    /// Create a configuration with the defaults: `localhost`, no port,
    /// protocol version `2.0`, `https`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute endpoint URL (takes precedence over host/port/path)
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the hostname to synthesize the endpoint from
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Set the port; the port segment is omitted when unset
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the endpoint path
    pub fn pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Override the JSON-RPC protocol version string (default `"2.0"`)
    pub fn jsonrpc_version(mut self, version: impl Into<String>) -> Self {
        self.jsonrpc_version = version.into();
        self
    }

    /// Use plain `http` instead of `https` for synthesized endpoints
    pub fn unsecure(mut self, unsecure: bool) -> Self {
        self.unsecure = unsecure;
        self
    }

    pub fn version_string(&self) -> &str {
        &self.jsonrpc_version
    }

    pub fn has_pathname(&self) -> bool {
        self.pathname.is_some()
    }

    /// Resolve the single canonical endpoint URL
    ///
    /// An explicit `url` wins outright; otherwise the endpoint is synthesized
    /// as `scheme://host[:port]/path`, scheme `http` when `unsecure`.
    pub fn endpoint(&self) -> Result<Url> {
        if let Some(url) = &self.url {
            return Ok(Url::parse(url)?);
        }

        let protocol = if self.unsecure { "http" } else { "https" };
        let port = match self.port {
            Some(port) => format!(":{port}"),
            None => String::new(),
        };
        let pathname = self.pathname.as_deref().unwrap_or("");
        let url = format!(
            "{protocol}://{hostname}{port}/{path}",
            hostname = self.hostname,
            path = pathname.trim_start_matches('/'),
        );

        Ok(Url::parse(&url)?)
    }
}
