//! Shared harness for the integration suites: the real router over a fresh
//! in-memory store, plus request helpers and fixtures.

pub mod contracts;

use std::sync::Arc;

use api_adapters::{build_router, AppState};
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use services::Services;
use storage_adapters::InMemoryStore;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(Services::new(store.clone()), store.stats(), "memory");
        Self {
            router: build_router(state, true),
            store,
        }
    }

    async fn dispatch(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Bytes) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .expect("valid request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        (status, bytes)
    }

    /// Send one request and decode the JSON response (`Null` when empty).
    pub async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let (status, bytes) = self.dispatch(method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// GET a plain-text endpoint such as `/metrics`.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let (status, bytes) = self.dispatch(Method::GET, uri, Body::empty()).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Body::from(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Body::from(body)).await
    }

    pub async fn user(&self, name: &str) -> i64 {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let (status, body) = self
            .post("/users", json!({ "name": name, "email": email }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    pub async fn board(&self, name: &str, admin: i64) -> i64 {
        let (status, body) = self
            .post("/boards", json!({ "name": name, "adminUserId": admin }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    pub async fn list(&self, name: &str, board: i64) -> i64 {
        let (status, body) = self
            .post("/lists", json!({ "name": name, "boardId": board }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    pub async fn card(&self, list: i64, owner: Option<i64>) -> i64 {
        let mut payload = card_payload("Ship the beta");
        if let Some(owner) = owner {
            payload["ownerUserId"] = json!(owner);
        }
        let (status, body) = self.post(&format!("/lists/{list}/cards"), payload).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }
}

pub fn card_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Cut the release branch",
        "due_date": "2026-11-30",
    })
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("response carries an id")
}

/// Field names of the violations in an error body.
pub fn violated_fields(body: &Value) -> Vec<String> {
    body["violations"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|v| v["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
