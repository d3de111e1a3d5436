use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use models::item::{InsertResult, Item};

use crate::errors::ServiceError;
use crate::generation::dalle::{DalleClient, DalleInput};
use crate::generation::stable_diffusion::{StableDiffusionClient, StableDiffusionInput};
use crate::items::ItemRepository;

/// Response of the Stable Diffusion flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredImage {
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub id: Value,
}

/// Generate-then-persist flows. Upstream failures are returned before anything
/// is written, so a failed call never leaves a document behind.
pub struct GenerationService {
    items: Arc<dyn ItemRepository>,
    dalle: DalleClient,
    stable_diffusion: StableDiffusionClient,
}

impl GenerationService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        dalle: DalleClient,
        stable_diffusion: StableDiffusionClient,
    ) -> Self {
        Self { items, dalle, stable_diffusion }
    }

    /// Call DALL·E and store its raw response with the submitted prompt.
    #[instrument(skip_all)]
    pub async fn dalle(&self, input: &DalleInput) -> Result<InsertResult, ServiceError> {
        let mut raw = self.dalle.create_image(input).await?;
        with_prompt_fields(&mut raw, &[("prompt", &input.prompt)]);
        let result = self.items.insert(raw).await?;
        info!(id = %result.inserted_id, "stored dalle response");
        Ok(result)
    }

    /// Call Stable Diffusion, store its raw response and return the first image URL
    /// with the new document id.
    #[instrument(skip_all)]
    pub async fn stable_diffusion(&self, input: &StableDiffusionInput) -> Result<StoredImage, ServiceError> {
        let mut out = self.stable_diffusion.text2img(input).await?;
        with_prompt_fields(
            &mut out.raw,
            &[("prompt", &input.prompt), ("negative_prompt", &input.negative_prompt)],
        );
        let result = self.items.insert(out.raw).await?;
        info!(id = %result.inserted_id, image_url = ?out.image_url, "stored stable diffusion response");
        Ok(StoredImage { image_url: out.image_url, id: result.inserted_id })
    }
}

/// Copy submitted prompt fields into the document unless the upstream already set them.
fn with_prompt_fields(raw: &mut Item, fields: &[(&str, &Option<String>)]) {
    for (key, value) in fields {
        if let Some(value) = value {
            raw.entry(*key).or_insert_with(|| Value::String(value.clone()));
        }
    }
}
