//! Common test utilities for scorebook integration tests
//!
//! Builds the full router over an in-process store and drives it with
//! `tower::ServiceExt::oneshot`, so no port is ever bound.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use ledger::{MemoryStore, Snapshot, SnapshotStore};
use scorebook::{router, AppState, Persister, Roster};
use scoreconf::SavePolicy;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// Cheapest cost bcrypt accepts.
pub const TEST_HASH_COST: u32 = 4;

pub struct TestApp {
    pub app: Router,
    pub roster: Arc<Roster>,
}

impl TestApp {
    pub fn new() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Self::with_store(store.clone(), SavePolicy::WriteThrough), store)
    }

    pub fn with_store(store: Arc<dyn SnapshotStore>, policy: SavePolicy) -> Self {
        let graph = store.load().unwrap_or_else(|_| Snapshot::default());
        let persister = Persister::new(store, policy);
        let roster = Arc::new(Roster::new(graph, persister, TEST_HASH_COST));
        Self {
            app: router(AppState::new(Arc::clone(&roster))),
            roster,
        }
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(body)).await
    }

    /// Register `name` with [`PASSWORD`] and return the new user id.
    pub async fn register(&self, name: &str) -> String {
        let (status, body) = self
            .post(
                "/accounts",
                json!({
                    "email": format!("{name}@example.com"),
                    "password": PASSWORD,
                    "username": name,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {name}: {body}");
        body["user"]["userId"].as_str().unwrap().to_string()
    }

    pub async fn create_team(&self, user_id: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/users/{user_id}/teams"),
                json!({ "password": PASSWORD, "displayName": "Varsity" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create team: {body}");
        body["team"]["teamId"].as_str().unwrap().to_string()
    }

    pub async fn create_player(&self, user_id: &str, team_id: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/users/{user_id}/teams/{team_id}/players"),
                json!({ "password": PASSWORD, "displayName": "Pat", "graduationYear": 2026 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create player: {body}");
        body["player"]["playerId"].as_str().unwrap().to_string()
    }

    pub async fn create_match(&self, user_id: &str, team_id: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/users/{user_id}/teams/{team_id}/matches"),
                json!({ "password": PASSWORD, "opposingTeamName": "Rivals" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create match: {body}");
        body["match"]["matchId"].as_str().unwrap().to_string()
    }
}

/// The zeroed game entry.
pub fn default_game() -> Value {
    json!({ "Wood": 0, "Score": 0, "isVarsity": false })
}
