//! Odoo JSON-RPC - Transport layer for the Odoo JSON-RPC API
//!
//! Provides the generic JSON-RPC 2.0 envelope client: endpoint resolution,
//! request-id sequencing, envelope shaping, and error-to-failure translation.
//! The network side is behind the [`Sender`](sender::Sender) trait so that
//! alternate transports can be plugged in at construction time.
//!
//! # Example
//!
//! ```no_run
//! use odoo_jsonrpc::{JsonrpcClient, JsonrpcConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = JsonrpcConfig::new()
//!     .hostname("odoo.example.com")
//!     .pathname("jsonrpc");
//! let client = JsonrpcClient::new(config)?;
//!
//! let result = client.execute("call", json!({ "service": "common" })).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod sender;

// Re-exports for convenience
pub use client::JsonrpcClient;
pub use config::JsonrpcConfig;
pub use error::{Error, Result};
pub use sender::{HttpSender, Sender};
