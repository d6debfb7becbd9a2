//! Shared fixtures for the HTTP integration tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use async_trait::async_trait;
use config_server::{
    app,
    auth::{Accounts, JwtService},
    error::StoreError,
    models::ConfigRecord,
    store::{ConfigStore, MemoryStore},
    AppState, BotConfig, EngineConfig,
};

pub const SECRET: &[u8] = b"integration-test-secret";
pub const ISSUER: &str = "config-server";

pub fn jwt() -> JwtService {
    JwtService::new(SECRET, ISSUER, 3600)
}

pub fn bitstamp_bot() -> BotConfig {
    BotConfig::new(
        "bitstamp-bot-1",
        "Bitstamp Bot",
        "Running",
        "https://hostname.one/api",
        "admin",
        "password",
    )
}

pub fn gdax_bot() -> BotConfig {
    BotConfig::new(
        "gdax-bot-1",
        "GDAX Bot",
        "stopped",
        "http://localhost:8082/api",
        "admin",
        "secret",
    )
}

/// State over empty in-memory stores with no login accounts.
pub fn empty_state() -> AppState {
    let bots: Arc<dyn ConfigStore<BotConfig>> = Arc::new(MemoryStore::<BotConfig>::new());
    let engines: Arc<dyn ConfigStore<EngineConfig>> = Arc::new(MemoryStore::<EngineConfig>::new());
    AppState::new(bots, engines, Accounts::new(), jwt())
}

/// State with the two standard bots already stored.
pub async fn seeded_state() -> AppState {
    let state = empty_state();
    state.bots.create(bitstamp_bot()).await.unwrap();
    state.bots.create(gdax_bot()).await.unwrap();
    state
}

/// Store whose backend is unreachable: every call fails with `Internal`.
pub struct DownStore;

#[async_trait]
impl<R: ConfigRecord> ConfigStore<R> for DownStore {
    async fn get_all(&self) -> Result<Vec<R>, StoreError> {
        Err(down())
    }

    async fn get_by_id(&self, _id: &str) -> Result<R, StoreError> {
        Err(down())
    }

    async fn create(&self, _record: R) -> Result<R, StoreError> {
        Err(down())
    }

    async fn update(&self, _record: R) -> Result<R, StoreError> {
        Err(down())
    }

    async fn delete(&self, _id: &str) -> Result<R, StoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::Internal("connection refused".to_string())
}

/// State whose engine store is unreachable while bots stay healthy.
pub fn engines_down_state() -> AppState {
    let bots: Arc<dyn ConfigStore<BotConfig>> = Arc::new(MemoryStore::<BotConfig>::new());
    let engines: Arc<dyn ConfigStore<EngineConfig>> = Arc::new(DownStore);
    AppState::new(bots, engines, Accounts::new(), jwt())
}

pub fn router(state: &AppState) -> Router {
    app(Arc::new(state.clone()))
}

pub fn token(state: &AppState) -> String {
    state.jwt.issue("tester").unwrap()
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON body (`Null` for empty bodies).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
