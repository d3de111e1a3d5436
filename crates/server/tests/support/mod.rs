#![allow(dead_code)]
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use bson::oid::ObjectId;
use configs::AppConfig;
use serde_json::Value;
use tower::ServiceExt;

use models::item::{DeleteResult, InsertResult, Item, UpdateResult};
use server::startup::{build_app, build_state};
use service::errors::ServiceError;
use service::items::{ItemRepository, MemoryItemRepository};

pub use service::test_support::spawn_upstream;

/// Base URL nothing listens on.
pub const CLOSED_PORT_BASE: &str = "http://127.0.0.1:9";

/// Config whose both generation APIs point at `upstream_base`.
pub fn config(upstream_base: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.openai.api_key = "sk-test".into();
    cfg.openai.base_url = upstream_base.to_string();
    cfg.openai.timeout_secs = 5;
    cfg.stable_diffusion.api_key = "sd-test".into();
    cfg.stable_diffusion.base_url = upstream_base.to_string();
    cfg.stable_diffusion.timeout_secs = 5;
    cfg
}

/// Application router over `items`, with generation calls going to `upstream_base`.
pub fn app_with_repo(upstream_base: &str, items: Arc<dyn ItemRepository>) -> Router {
    let state = build_state(&config(upstream_base), items).expect("state");
    build_app(state)
}

/// Application router over an in-memory repository.
pub fn app_with_base(upstream_base: &str) -> (Router, Arc<MemoryItemRepository>) {
    let repo = Arc::new(MemoryItemRepository::new());
    (app_with_repo(upstream_base, repo.clone()), repo)
}

/// Application router with generation calls served by `upstream`.
pub async fn app_with_upstream(upstream: Router) -> (Router, Arc<MemoryItemRepository>) {
    let base = spawn_upstream(upstream).await;
    app_with_base(&base)
}

/// Application router whose upstream answers 404 to everything.
pub async fn app() -> (Router, Arc<MemoryItemRepository>) {
    app_with_upstream(Router::new()).await
}

/// Repository whose every call fails like a lost database connection.
pub struct FailingRepository;

fn lost() -> ServiceError {
    ServiceError::Connectivity("connection reset".into())
}

#[async_trait]
impl ItemRepository for FailingRepository {
    async fn insert(&self, _item: Item) -> Result<InsertResult, ServiceError> {
        Err(lost())
    }

    async fn find_all(&self) -> Result<Vec<Item>, ServiceError> {
        Err(lost())
    }

    async fn update_by_id(&self, _id: &ObjectId, _fields: Item) -> Result<UpdateResult, ServiceError> {
        Err(lost())
    }

    async fn delete_by_id(&self, _id: &ObjectId) -> Result<DeleteResult, ServiceError> {
        Err(lost())
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).expect("encode"))),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    (status, bytes)
}

pub fn json(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).expect("json body")
}
