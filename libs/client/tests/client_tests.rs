use std::sync::{Arc, Mutex};

use odoo_client::{error::Error, OdooClient, OdooConfig};
use odoo_jsonrpc::{error::Result as RpcResult, sender::Sender, JsonrpcConfig};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use url::Url;

/// Recording sender that captures every envelope and replays canned responses
#[derive(Clone)]
struct MockSender {
    requests: Arc<Mutex<Vec<(Url, Value)>>>,
    responses: Arc<Mutex<Vec<Value>>>,
}

impl MockSender {
    fn new(responses: Vec<Value>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses)),
        }
    }

    fn requests(&self) -> Vec<(Url, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sender for MockSender {
    async fn send(&self, url: &Url, data: &Value, _headers: &HeaderMap) -> RpcResult<Value> {
        self.requests.lock().unwrap().push((url.clone(), data.clone()));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(json!({ "result": {} }))
        } else {
            Ok(responses.remove(0))
        }
    }
}

fn test_config() -> OdooConfig {
    OdooConfig::new(
        "db_test",
        JsonrpcConfig::new()
            .hostname("test.com")
            .port(8888)
            .pathname("/api"),
    )
}

fn client_with(responses: Vec<Value>) -> (OdooClient, MockSender) {
    let sender = MockSender::new(responses);
    let client = OdooClient::with_sender(test_config(), sender.clone()).unwrap();
    (client, sender)
}

/// Authenticate with a canned uid of 1 so object calls are allowed
async fn authenticated_client(responses: Vec<Value>) -> (OdooClient, MockSender) {
    let mut all = vec![json!({ "result": 1 })];
    all.extend(responses);
    let (client, sender) = client_with(all);
    client.authenticate("username_test", "password_test", true).await.unwrap();
    (client, sender)
}

#[tokio::test]
async fn common_call_envelope_shape() {
    let (client, sender) = client_with(vec![]);

    client.common("method", vec![json!("param")]).await.unwrap();

    let (url, data) = &sender.requests()[0];
    assert_eq!(url.as_str(), "https://test.com:8888/api");
    assert_eq!(
        data,
        &json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": "common",
                "method": "method",
                "args": ["param"],
            },
            "id": 1,
        })
    );
}

#[tokio::test]
async fn pathname_defaults_to_jsonrpc() {
    let config = OdooConfig::new("db_test", JsonrpcConfig::new().hostname("test.com"));
    let sender = MockSender::new(vec![]);
    let client = OdooClient::with_sender(config, sender.clone()).unwrap();

    client.version().await.unwrap();

    let (url, _) = &sender.requests()[0];
    assert_eq!(url.as_str(), "https://test.com/jsonrpc");
}

#[tokio::test]
async fn version_is_a_common_call_without_arguments() {
    let (client, sender) = client_with(vec![]);

    client.version().await.unwrap();

    let (_, data) = &sender.requests()[0];
    assert_eq!(
        data["params"],
        json!({ "service": "common", "method": "version", "args": [] })
    );
}

#[tokio::test]
async fn authenticate_call_shape() {
    let (client, sender) = client_with(vec![json!({ "result": 1 })]);

    client.authenticate("username_test", "password_test", true).await.unwrap();

    let (_, data) = &sender.requests()[0];
    assert_eq!(
        data["params"],
        json!({
            "service": "common",
            "method": "authenticate",
            "args": ["db_test", "username_test", "password_test", {}],
        })
    );
}

#[tokio::test]
async fn object_call_before_authentication_fails_without_network() {
    let (client, sender) = client_with(vec![]);

    let result = client.object("method", vec![json!("param")]).await;

    match result.unwrap_err() {
        Error::Unauthenticated => {}
        e => panic!("Expected Unauthenticated, got {:?}", e),
    }
    assert!(sender.requests().is_empty());
}

#[tokio::test]
async fn object_call_prepends_credentials() {
    let (client, sender) = authenticated_client(vec![]).await;

    client.object("method", vec![json!("param")]).await.unwrap();

    let (_, data) = &sender.requests()[1];
    assert_eq!(
        data["params"],
        json!({
            "service": "object",
            "method": "method",
            "args": ["db_test", 1, "password_test", "param"],
        })
    );
}

#[tokio::test]
async fn authenticate_without_persist_keeps_object_calls_protected() {
    let (client, sender) = client_with(vec![json!({ "result": 1 })]);

    let uid = client
        .authenticate("username_test", "password_test", false)
        .await
        .unwrap();
    assert_eq!(uid, json!(1));

    let result = client.object("method", vec![]).await;
    assert!(matches!(result.unwrap_err(), Error::Unauthenticated));
    assert_eq!(sender.requests().len(), 1);
}

#[tokio::test]
async fn falsy_uid_is_returned_but_not_persisted() {
    let (client, _) = client_with(vec![json!({ "result": false })]);

    let uid = client
        .authenticate("username_test", "wrong_key", true)
        .await
        .unwrap();
    assert_eq!(uid, json!(false));
    assert!(client.session().is_none());
}

#[tokio::test]
async fn authenticate_failure_is_opaque() {
    let (client, _) = client_with(vec![json!({
        "error": { "message": "Access Denied", "code": 100 }
    })]);

    let result = client.authenticate("username_test", "password_test", true).await;

    match result.unwrap_err() {
        Error::AuthenticationFailed => {}
        e => panic!("Expected AuthenticationFailed, got {:?}", e),
    }
}

#[tokio::test]
async fn helpers_do_not_transmit_options() {
    let (client, sender) = authenticated_client(vec![]).await;

    client
        .read(
            "my.model",
            vec![json!("param")],
            json!({ "filter1": "value1" }),
        )
        .await
        .unwrap();

    let (_, data) = &sender.requests()[1];
    assert_eq!(
        data["params"]["args"],
        json!(["db_test", 1, "password_test", "my.model", "read", ["param"]])
    );
}

#[tokio::test]
async fn search_read_merges_fields_into_transmitted_options() {
    let (client, sender) = authenticated_client(vec![]).await;

    client
        .search_read(
            "my.model",
            vec![json!("param")],
            vec![json!("f1"), json!("f2")],
            json!({ "limit": 5 }),
        )
        .await
        .unwrap();

    let (_, data) = &sender.requests()[1];
    assert_eq!(
        data["params"]["args"],
        json!([
            "db_test",
            1,
            "password_test",
            "my.model",
            "search_read",
            [["param"]],
            { "limit": 5, "fields": ["f1", "f2"] },
        ])
    );
}

#[tokio::test]
async fn helpers_map_to_server_method_names() {
    let (client, sender) = authenticated_client(vec![]).await;

    client.search("my.model", vec![], json!({})).await.unwrap();
    client.search_count("my.model", vec![], json!({})).await.unwrap();
    client.fields_get("my.model", vec![], json!({})).await.unwrap();
    client.create("my.model", vec![], json!({})).await.unwrap();
    client.update("my.model", vec![], json!({})).await.unwrap();
    client.remove("my.model", vec![], json!({})).await.unwrap();

    let methods: Vec<Value> = sender.requests()[1..]
        .iter()
        .map(|(_, data)| data["params"]["args"][4].clone())
        .collect();
    assert_eq!(
        methods,
        vec![
            json!("search"),
            json!("search_count"),
            json!("fields_get"),
            json!("create"),
            json!("write"),
            json!("unlink"),
        ]
    );
}

#[tokio::test]
async fn sequence_ids_span_authentication_and_model_calls() {
    let (client, sender) = authenticated_client(vec![]).await;

    client.version().await.unwrap();
    client.read("my.model", vec![], json!({})).await.unwrap();

    let ids: Vec<Value> = sender
        .requests()
        .iter()
        .map(|(_, data)| data["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
}
