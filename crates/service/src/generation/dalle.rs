use configs::UpstreamConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use models::item::Item;

use crate::errors::ServiceError;
use crate::generation::{http_client, read_object};

const SERVICE: &str = "openai";

/// Images requested per call.
pub const IMAGE_COUNT: u32 = 1;
pub const IMAGE_SIZE: &str = "1024x1024";

/// Body accepted by `POST /dalle`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DalleInput {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    n: u32,
    size: &'static str,
}

/// Client for the OpenAI image generation endpoint.
pub struct DalleClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DalleClient {
    pub fn new(cfg: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = http_client(cfg)?;
        let endpoint = format!("{}/images/generations", cfg.base_url.trim_end_matches('/'));
        info!(%endpoint, "dalle client configured");
        Ok(Self { client, endpoint, api_key: cfg.api_key.clone() })
    }

    /// Request one 1024x1024 image for `input.prompt` and return the raw response body.
    pub async fn create_image(&self, input: &DalleInput) -> Result<Item, ServiceError> {
        let body = ImageGenerationRequest {
            prompt: input.prompt.as_deref(),
            n: IMAGE_COUNT,
            size: IMAGE_SIZE,
        };
        debug!(endpoint = %self.endpoint, "requesting image");
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::external(SERVICE, e))?;
        read_object(resp, SERVICE).await
    }
}
