use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use models::item::InsertResult;
use service::generation::{DalleInput, StableDiffusionInput, StoredImage};

use crate::state::ServerState;

pub const DALLE_FAILED_TEXT: &str = "An error occurred while processing your request.";

#[utoipa::path(
    post, path = "/dalle", tag = "generation",
    request_body = crate::openapi::DalleRequestDoc,
    responses(
        (status = 200, description = "Raw response stored", body = crate::openapi::InsertResultDoc),
        (status = 500, description = "Generation Failed")
    )
)]
pub async fn dalle(
    State(state): State<ServerState>,
    Json(input): Json<DalleInput>,
) -> Result<Json<InsertResult>, Response> {
    state
        .generation
        .dalle(&input)
        .await
        .map(Json)
        .map_err(|e| {
            error!(err = %e, "dalle generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, DALLE_FAILED_TEXT).into_response()
        })
}

#[utoipa::path(
    post, path = "/sd", tag = "generation",
    request_body = crate::openapi::StableDiffusionRequestDoc,
    responses(
        (status = 200, description = "Image URL and stored id", body = crate::openapi::StoredImageDoc),
        (status = 500, description = "Generation Failed")
    )
)]
pub async fn stable_diffusion(
    State(state): State<ServerState>,
    Json(input): Json<StableDiffusionInput>,
) -> Result<Json<StoredImage>, Response> {
    state
        .generation
        .stable_diffusion(&input)
        .await
        .map(Json)
        .map_err(|e| {
            error!(err = %e, "stable diffusion generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "An error occurred"}))).into_response()
        })
}
