use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value, json};

use booking_intake::config::{Config, DatastoreConfig, Environment};
use booking_intake::store::{RecordStore, SharedStore, StoreError};

/// What the stub datastore answers to every insert.
#[allow(dead_code)]
#[derive(Clone)]
pub enum StubReply {
    Row(Value),
    Empty,
    Fail(StoreError),
}

/// One recorded insert call.
#[derive(Debug, Clone)]
pub struct InsertCall {
    pub table: String,
    pub record: Map<String, Value>,
    pub returning: Vec<String>,
}

/// Datastore stub that records every insert and replies with a fixed answer.
pub struct RecordingStore {
    reply: StubReply,
    calls: Mutex<Vec<InsertCall>>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Replies with `{id, created_at}` for the given id.
    pub fn returning_id(id: u64) -> Arc<Self> {
        Self::new(StubReply::Row(json!({
            "id": id,
            "created_at": "2024-06-01T12:00:00+00:00",
        })))
    }

    pub fn calls(&self) -> Vec<InsertCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn insert(
        &self,
        table: &str,
        record: &Map<String, Value>,
        returning: &[&str],
    ) -> Result<Option<Value>, StoreError> {
        self.calls.lock().unwrap().push(InsertCall {
            table: table.to_string(),
            record: record.clone(),
            returning: returning.iter().map(|s| s.to_string()).collect(),
        });

        match &self.reply {
            StubReply::Row(row) => Ok(Some(row.clone())),
            StubReply::Empty => Ok(None),
            StubReply::Fail(err) => Err(err.clone()),
        }
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body, return (body, status, allow-origin header).
    pub async fn post_json(&self, path: &str, data: &Value) -> (Value, StatusCode, Option<String>) {
        let resp = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(data.to_string())
            .send()
            .await
            .expect("post json failed");
        read(resp).await
    }

    /// POST a raw body with the given content type.
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: &str,
    ) -> (Value, StatusCode, Option<String>) {
        let resp = self
            .client
            .post(self.url(path))
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("post raw failed");
        read(resp).await
    }

    pub async fn booking(&self, data: &Value) -> (Value, StatusCode) {
        let (body, status, _) = self.post_json("/api/submit-booking", data).await;
        (body, status)
    }

    pub async fn contact(&self, data: &Value) -> (Value, StatusCode) {
        let (body, status, _) = self.post_json("/api/submit-form", data).await;
        (body, status)
    }
}

async fn read(resp: reqwest::Response) -> (Value, StatusCode, Option<String>) {
    let status = resp.status();
    let origin = resp
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body: Value = resp.json().await.unwrap_or(json!(null));
    (body, status, origin)
}

pub fn test_config(environment: Environment) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 65_536,
        log_level: "warn".to_string(),
        environment,
        datastore: Some(DatastoreConfig {
            url: "http://datastore.invalid".to_string(),
            service_key: "test-service-key".to_string(),
            timeout_secs: 5,
        }),
    }
}

/// Spawn the app backed by a stub store.
#[allow(dead_code)]
pub async fn spawn_app(store: Arc<RecordingStore>) -> TestApp {
    let store: SharedStore = store;
    spawn_with(test_config(Environment::Production), Some(store)).await
}

/// Spawn the app with explicit configuration.
pub async fn spawn_with(config: Config, store: Option<SharedStore>) -> TestApp {
    let app = booking_intake::build_app(config, store);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

/// A booking payload that passes validation.
#[allow(dead_code)]
pub fn valid_booking() -> Value {
    json!({
        "name": "Anna Petrova",
        "phone": "+7 900 123-45-67",
        "email": "anna@example.com",
        "guests": 4,
        "date": "2024-06-15",
        "time": "19:30",
    })
}
