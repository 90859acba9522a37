use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{json, Value};

use odoo_jsonrpc::{HttpSender, Sender};

use crate::client::{OdooClient, OdooConfig};
use crate::error::Result;
use crate::session::{is_truthy, Session};
use crate::store::{keys, SessionStore};

type SenderFactory = Box<dyn Fn() -> Box<dyn Sender> + Send + Sync>;

/// Session-aware client provider
///
/// Keeps the session externally persisted in a [`SessionStore`] and reloads
/// it at [`init`](Self::init), giving session continuity across process
/// restarts. Configuration changes never mutate an existing transport in
/// place: [`update_config`](Self::update_config) replaces the inner client
/// wholesale and invalidates the session identity.
///
/// Until `init` completes, every operation resolves to the sentinel
/// [`Value::Null`] without touching the network.
pub struct OdooProvider<S: SessionStore> {
    store: S,
    sender_factory: SenderFactory,
    config: RwLock<OdooConfig>,
    client: RwLock<Option<Arc<OdooClient>>>,
    ready: AtomicBool,
}

impl<S: SessionStore> OdooProvider<S> {
    /// Create a provider backed by the default HTTP sender
    ///
    /// Not ready until [`init`](Self::init) has run.
    pub fn new(config: OdooConfig, store: S) -> Self {
        Self::with_sender_factory(config, store, || Box::new(HttpSender::new()))
    }

    /// Create a provider that builds its transports through a custom sender
    /// factory; the factory runs once per transport construction
    pub fn with_sender_factory(
        config: OdooConfig,
        store: S,
        sender_factory: impl Fn() -> Box<dyn Sender> + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            sender_factory: Box::new(sender_factory),
            config: RwLock::new(config),
            client: RwLock::new(None),
            ready: AtomicBool::new(false),
        }
    }

    /// Reload the persisted session and construct the inner client
    ///
    /// Persisted hostname and database name override the supplied
    /// configuration; a complete persisted credential triple (login, api key,
    /// uid) restores the authenticated session. Flips the ready flag last.
    pub async fn init(&self) -> Result<()> {
        let mut config = self.config_snapshot();

        if let Some(hostname) = self.store.get(keys::HOSTNAME).await? {
            config.rpc = config.rpc.hostname(hostname);
        }
        if let Some(db_name) = self.store.get(keys::DB_NAME).await? {
            config.db_name = db_name;
        }

        let client = self.build_client(config.clone())?;

        let login = self.store.get(keys::LOGIN).await?;
        let api_key = self.store.get(keys::API_KEY).await?;
        let uid = self.store.get(keys::UID).await?;
        if let (Some(login), Some(api_key), Some(raw_uid)) = (login, api_key, uid) {
            let uid = serde_json::from_str(&raw_uid).unwrap_or(Value::String(raw_uid));
            client.restore_session(Session::new(login, uid, api_key));
        }

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(client));
        self.ready.store(true, Ordering::SeqCst);

        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> OdooConfig {
        self.config_snapshot()
    }

    /// Replace the configuration and the inner client wholesale
    ///
    /// A new endpoint means a new transport; the session identity is
    /// invalidated, both in memory (fresh client holds no session) and in the
    /// store (persisted uid removed).
    pub async fn update_config(&self, new_config: OdooConfig) -> Result<()> {
        let client = self.build_client(new_config.clone())?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = new_config;
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(client));

        self.store.remove(keys::UID).await?;

        Ok(())
    }

    /// Authenticate and persist the session fields under the fixed keys
    pub async fn authenticate(&self, login: &str, api_key: &str) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };

        let uid = client.authenticate(login, api_key, true).await?;

        if is_truthy(&uid) {
            let hostname = client.url().host_str().unwrap_or_default().to_string();
            self.store.set(keys::HOSTNAME, &hostname).await?;
            self.store.set(keys::DB_NAME, client.db_name()).await?;
            self.store.set(keys::LOGIN, login).await?;
            self.store.set(keys::API_KEY, api_key).await?;
            self.store.set(keys::UID, &uid.to_string()).await?;
        }

        Ok(uid)
    }

    /// Clear the in-memory and persisted session fields
    ///
    /// Reports `false` only when the persistence layer itself fails; never
    /// an error.
    pub async fn disconnect(&self) -> bool {
        if let Some(client) = self.client_snapshot() {
            client.clear_session();
        }

        for key in keys::ALL {
            if let Err(err) = self.store.remove(key).await {
                tracing::error!(%err, key, "failed to clear persisted session field");
                return false;
            }
        }

        true
    }

    /// Current principal snapshot: login, uid, and database name
    pub fn profile(&self) -> Value {
        let Some(client) = self.client_snapshot() else {
            return Value::Null;
        };

        match client.session() {
            Some(session) => json!({
                "login": session.login,
                "uid": session.uid,
                "dbName": client.db_name(),
            }),
            None => json!({
                "login": null,
                "uid": null,
                "dbName": client.db_name(),
            }),
        }
    }

    pub async fn version(&self) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.version().await
    }

    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        options: Option<Value>,
    ) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.execute_kw(model, method, args, options).await
    }

    pub async fn read(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.read(model, args, options).await
    }

    pub async fn search(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.search(model, args, options).await
    }

    pub async fn search_read(
        &self,
        model: &str,
        filter: Vec<Value>,
        fields: Vec<Value>,
        options: Value,
    ) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.search_read(model, filter, fields, options).await
    }

    pub async fn search_count(
        &self,
        model: &str,
        args: Vec<Value>,
        options: Value,
    ) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.search_count(model, args, options).await
    }

    pub async fn fields_get(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.fields_get(model, args, options).await
    }

    pub async fn create(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.create(model, args, options).await
    }

    pub async fn update(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.update(model, args, options).await
    }

    pub async fn remove(&self, model: &str, args: Vec<Value>, options: Value) -> Result<Value> {
        let Some(client) = self.client_snapshot() else {
            return Ok(Value::Null);
        };
        client.remove(model, args, options).await
    }

    fn build_client(&self, config: OdooConfig) -> Result<OdooClient> {
        OdooClient::with_sender(config, (self.sender_factory)())
    }

    fn config_snapshot(&self) -> OdooConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Lock held only for the clone, never across an await
    fn client_snapshot(&self) -> Option<Arc<OdooClient>> {
        if !self.is_ready() {
            return None;
        }
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
