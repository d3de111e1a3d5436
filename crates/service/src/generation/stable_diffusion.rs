use configs::UpstreamConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use models::item::Item;

use crate::errors::ServiceError;
use crate::generation::{http_client, read_object};

const SERVICE: &str = "stable_diffusion";

/// Body accepted by `POST /sd`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StableDiffusionInput {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// text2img payload. Numeric knobs are strings because that is what the API expects.
#[derive(Debug, Serialize)]
struct Text2ImgRequest<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
    width: &'static str,
    height: &'static str,
    samples: &'static str,
    num_inference_steps: &'static str,
    seed: Option<u64>,
    guidance_scale: f64,
    safety_checker: &'static str,
    multi_lingual: &'static str,
    panorama: &'static str,
    self_attention: &'static str,
    upscale: &'static str,
    embeddings_model: Option<String>,
    webhook: Option<String>,
    track_id: Option<String>,
}

impl<'a> Text2ImgRequest<'a> {
    fn new(key: &'a str, input: &'a StableDiffusionInput) -> Self {
        Self {
            key,
            prompt: input.prompt.as_deref(),
            negative_prompt: input.negative_prompt.as_deref(),
            width: "512",
            height: "512",
            samples: "1",
            num_inference_steps: "20",
            seed: None,
            guidance_scale: 7.5,
            safety_checker: "yes",
            multi_lingual: "no",
            panorama: "no",
            self_attention: "no",
            upscale: "no",
            embeddings_model: None,
            webhook: None,
            track_id: None,
        }
    }
}

/// A successful text2img call.
#[derive(Debug, Clone)]
pub struct Text2ImgOutput {
    /// First entry of `output`, absent when the array is empty.
    pub image_url: Option<String>,
    pub raw: Item,
}

impl Text2ImgOutput {
    fn from_raw(raw: Item) -> Result<Self, ServiceError> {
        let output = raw
            .get("output")
            .and_then(Value::as_array)
            .ok_or_else(|| ServiceError::external(SERVICE, describe_failure(&raw)))?;
        let image_url = output.first().and_then(Value::as_str).map(str::to_owned);
        Ok(Self { image_url, raw })
    }
}

fn describe_failure(raw: &Item) -> String {
    match raw.get("message").and_then(Value::as_str) {
        Some(msg) => format!("no output in response: {msg}"),
        None => "no output in response".to_string(),
    }
}

/// Client for the stablediffusionapi.com text2img endpoint.
pub struct StableDiffusionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl StableDiffusionClient {
    pub fn new(cfg: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = http_client(cfg)?;
        let endpoint = format!("{}/text2img", cfg.base_url.trim_end_matches('/'));
        info!(%endpoint, "stable diffusion client configured");
        Ok(Self { client, endpoint, api_key: cfg.api_key.clone() })
    }

    /// Request one 512x512 image with the fixed generation parameters.
    pub async fn text2img(&self, input: &StableDiffusionInput) -> Result<Text2ImgOutput, ServiceError> {
        let body = Text2ImgRequest::new(&self.api_key, input);
        debug!(endpoint = %self.endpoint, "requesting image");
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::external(SERVICE, e))?;
        let raw = read_object(resp, SERVICE).await?;
        Text2ImgOutput::from_raw(raw)
    }
}
