#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use production_tracker::{
    config::{AppConfig, StorageBackend},
    db,
    events,
    repositories::Storage,
    AppState,
};
use tower::ServiceExt;

/// Response captured by [`TestApp::request`].
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }
}

/// Helper harness wrapping the full application router.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    fn config(storage_backend: StorageBackend) -> AppConfig {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.storage_backend = storage_backend;
        cfg.cors_allow_any_origin = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg
    }

    fn build(cfg: AppConfig, storage: Storage) -> Self {
        let (event_sender, event_rx) = events::channel(cfg.event_channel_capacity);
        let event_task = tokio::spawn(events::process_events(event_rx));
        let state = AppState::new(cfg, storage, event_sender);
        let router = production_tracker::app(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Application backed by the in-memory store.
    pub async fn new() -> Self {
        Self::build(Self::config(StorageBackend::InMemory), Storage::in_memory())
    }

    /// Application backed by a migrated in-memory SQLite database.
    pub async fn with_database() -> Self {
        let cfg = Self::config(StorageBackend::Database);
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        Self::build(cfg, Storage::database(Arc::new(pool)))
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("valid request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates an order and returns its JSON representation.
    pub async fn create_order(&self, body: Value) -> Value {
        let response = self.post("/api/v1/orders", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }
}
