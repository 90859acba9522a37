//! Odoo client - Two-tier RPC adapter and session layer
//!
//! Expresses the Odoo call taxonomy (`common` service for session, auth and
//! meta calls; `object` service for authenticated model calls) on top of the
//! [`odoo_jsonrpc`] transport, plus a session-aware provider that persists
//! credentials in a key-value [`SessionStore`](store::SessionStore).
//!
//! # Example
//!
//! ```no_run
//! use odoo_client::{OdooClient, OdooConfig};
//! use odoo_jsonrpc::JsonrpcConfig;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OdooConfig::new("mydb", JsonrpcConfig::new().hostname("odoo.example.com"));
//! let client = OdooClient::new(config)?;
//!
//! client.authenticate("admin", "secret", true).await?;
//! let partners = client
//!     .search_read("res.partner", vec![], vec![json!("name")], json!({}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use client::{OdooClient, OdooConfig};
pub use error::{Error, Result};
pub use provider::OdooProvider;
pub use session::Session;
