//! Clients for the third-party image generation APIs and the
//! generate-then-persist flows built on them.

pub mod dalle;
pub mod service;
pub mod stable_diffusion;

use std::time::Duration;

use configs::UpstreamConfig;
use reqwest::Client;
use serde_json::Value;

use models::item::Item;

use crate::errors::ServiceError;

pub use dalle::{DalleClient, DalleInput};
pub use service::{GenerationService, StoredImage};
pub use stable_diffusion::{StableDiffusionClient, StableDiffusionInput, Text2ImgOutput};

fn http_client(cfg: &UpstreamConfig) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;
    Ok(client)
}

/// Check the status and decode a JSON object body.
async fn read_object(resp: reqwest::Response, service: &str) -> Result<Item, ServiceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ServiceError::external(service, format!("status {status}: {body}")));
    }
    let body: Value = resp
        .json()
        .await
        .map_err(|e| ServiceError::external(service, format!("malformed response: {e}")))?;
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ServiceError::external(
            service,
            format!("expected a JSON object, got {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
