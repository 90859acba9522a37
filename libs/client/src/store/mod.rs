use std::sync::Arc;

use crate::error::Result;

pub mod memory;

pub use self::memory::MemoryStore;

/// Fixed key names for persisted session fields; all absent on first run
pub mod keys {
    pub const HOSTNAME: &str = "hostname";
    pub const DB_NAME: &str = "dbName";
    pub const LOGIN: &str = "login";
    pub const API_KEY: &str = "apiKey";
    pub const UID: &str = "uid";

    pub const ALL: [&str; 5] = [HOSTNAME, DB_NAME, LOGIN, API_KEY, UID];
}

/// Key-value persistence for session continuity across restarts
///
/// Implementors map the fixed [`keys`] to flat string values in whatever
/// host mechanism is available (a file, a keychain, a browser store).
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the value under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the entry under `key`; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait::async_trait]
impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
