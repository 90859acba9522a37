use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

use odoo_jsonrpc::{JsonrpcClient, JsonrpcConfig, Sender};

use crate::error::{Error, Result};
use crate::session::{is_truthy, Session};

const API_METHOD_CALL: &str = "call";
const SERVICE_COMMON: &str = "common";
const SERVICE_OBJECT: &str = "object";

const DEFAULT_PATHNAME: &str = "jsonrpc";

/// Configuration for an [`OdooClient`]: the database name plus the endpoint
/// configuration of the underlying JSON-RPC transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdooConfig {
    pub db_name: String,
    pub rpc: JsonrpcConfig,
}

impl OdooConfig {
    pub fn new(db_name: impl Into<String>, rpc: JsonrpcConfig) -> Self {
        Self {
            db_name: db_name.into(),
            rpc,
        }
    }
}

/// Client for the Odoo two-tier JSON-RPC call model
///
/// Wraps a [`JsonrpcClient`] with the `common` (unauthenticated) and `object`
/// (authenticated) service taxonomy and owns the session record. The session
/// is replaced as a whole on a successful [`authenticate`](Self::authenticate)
/// and never mutated field-by-field.
pub struct OdooClient {
    db_name: String,
    rpc: JsonrpcClient,
    session: RwLock<Option<Session>>,
}

impl OdooClient {
    /// Create a client with the default HTTP sender
    ///
    /// The endpoint path defaults to `jsonrpc` when the configuration does
    /// not set one.
    pub fn new(config: OdooConfig) -> Result<Self> {
        let rpc = JsonrpcClient::new(Self::rpc_config(config.rpc))?;
        Ok(Self::from_parts(config.db_name, rpc))
    }

    /// Create a client with a custom sender
    pub fn with_sender(config: OdooConfig, sender: impl Sender + 'static) -> Result<Self> {
        let rpc = JsonrpcClient::with_sender(Self::rpc_config(config.rpc), sender)?;
        Ok(Self::from_parts(config.db_name, rpc))
    }

    fn rpc_config(config: JsonrpcConfig) -> JsonrpcConfig {
        if config.has_pathname() {
            config
        } else {
            config.pathname(DEFAULT_PATHNAME)
        }
    }

    fn from_parts(db_name: String, rpc: JsonrpcClient) -> Self {
        Self {
            db_name,
            rpc,
            session: RwLock::new(None),
        }
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// The resolved endpoint URL of the underlying transport
    pub fn url(&self) -> &Url {
        self.rpc.url()
    }

    /// Snapshot of the current session record, if any
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a previously persisted session record as a whole
    pub fn restore_session(&self, session: Session) {
        self.replace_session(Some(session));
    }

    /// Drop the session record; subsequent object-service calls fail until
    /// the next successful authentication
    pub fn clear_session(&self) {
        self.replace_session(None);
    }

    fn replace_session(&self, session: Option<Session>) {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Call a method of the `common` service (always allowed)
    pub async fn common(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let result = self
            .rpc
            .execute(
                API_METHOD_CALL,
                json!({
                    "service": SERVICE_COMMON,
                    "method": method,
                    "args": args,
                }),
            )
            .await?;

        Ok(result)
    }

    /// Call a method of the `object` service
    ///
    /// Fails with [`Error::Unauthenticated`] before any network activity when
    /// no session is held. The database name, user id, and secret are
    /// prepended to the supplied arguments.
    pub async fn object(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let (uid, secret) = {
            let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
            let session = guard.as_ref().ok_or(Error::Unauthenticated)?;
            (session.uid.clone(), session.secret.clone())
        };

        let mut call_args = vec![json!(self.db_name), uid, json!(secret)];
        call_args.extend(args);

        let result = self
            .rpc
            .execute(
                API_METHOD_CALL,
                json!({
                    "service": SERVICE_OBJECT,
                    "method": method,
                    "args": call_args,
                }),
            )
            .await?;

        Ok(result)
    }

    /// Authenticate against the configured database
    ///
    /// Returns the server-assigned identifier verbatim; a falsy identifier
    /// signals failed authentication without an error (the server's
    /// convention). With `persist`, a truthy identifier is stored together
    /// with the login and secret as the new session record. Any underlying
    /// failure is logged and surfaced as the opaque
    /// [`Error::AuthenticationFailed`].
    pub async fn authenticate(&self, login: &str, secret: &str, persist: bool) -> Result<Value> {
        let result = self
            .common(
                "authenticate",
                vec![json!(self.db_name), json!(login), json!(secret), json!({})],
            )
            .await;

        let uid = match result {
            Ok(uid) => uid,
            Err(err) => {
                tracing::error!(%err, login, "authentication call failed");
                return Err(Error::AuthenticationFailed);
            }
        };

        if persist && is_truthy(&uid) {
            self.replace_session(Some(Session::new(login, uid.clone(), secret)));
        }

        Ok(uid)
    }

    /// Server version information (`common` service, no arguments)
    pub async fn version(&self) -> Result<Value> {
        self.common("version", vec![]).await
    }

    /// The single primitive underlying all model helpers:
    /// `execute_kw(model, method, args)` on the `object` service
    ///
    /// `options` is transmitted only when `Some`. The model helpers accept an
    /// options argument but pass `None` here, matching the wrapped API's
    /// historical calling convention; only [`search_read`](Self::search_read)
    /// sends one.
    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        options: Option<Value>,
    ) -> Result<Value> {
        let mut call_args = vec![json!(model), json!(method), Value::Array(args)];
        if let Some(options) = options {
            call_args.push(options);
        }

        self.object("execute_kw", call_args).await
    }

    pub async fn read(&self, model: &str, args: Vec<Value>, _options: Value) -> Result<Value> {
        self.execute_kw(model, "read", args, None).await
    }

    pub async fn search(&self, model: &str, args: Vec<Value>, _options: Value) -> Result<Value> {
        self.execute_kw(model, "search", args, None).await
    }

    /// Search and read in one round trip
    ///
    /// The domain filter is wrapped in an extra array level and `fields` is
    /// merged into the transmitted options, so the wire arguments end up as
    /// `[db, uid, secret, model, "search_read", [filter], {..options, fields}]`.
    pub async fn search_read(
        &self,
        model: &str,
        filter: Vec<Value>,
        fields: Vec<Value>,
        options: Value,
    ) -> Result<Value> {
        let mut merged = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.insert("fields".to_string(), Value::Array(fields));

        self.execute_kw(
            model,
            "search_read",
            vec![Value::Array(filter)],
            Some(Value::Object(merged)),
        )
        .await
    }

    pub async fn search_count(
        &self,
        model: &str,
        args: Vec<Value>,
        _options: Value,
    ) -> Result<Value> {
        self.execute_kw(model, "search_count", args, None).await
    }

    pub async fn fields_get(
        &self,
        model: &str,
        args: Vec<Value>,
        _options: Value,
    ) -> Result<Value> {
        self.execute_kw(model, "fields_get", args, None).await
    }

    pub async fn create(&self, model: &str, args: Vec<Value>, _options: Value) -> Result<Value> {
        self.execute_kw(model, "create", args, None).await
    }

    pub async fn update(&self, model: &str, args: Vec<Value>, _options: Value) -> Result<Value> {
        self.execute_kw(model, "write", args, None).await
    }

    pub async fn remove(&self, model: &str, args: Vec<Value>, _options: Value) -> Result<Value> {
        self.execute_kw(model, "unlink", args, None).await
    }
}
