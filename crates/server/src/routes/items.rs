use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use models::item::{self, DeleteResult, InsertResult, Item, UpdateResult};
use service::errors::ServiceError;
use service::items::update_existing;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const NOT_FOUND_TEXT: &str = "No document found for the provided ID.";
pub const UPDATE_FAILED_TEXT: &str = "An error occurred while updating the document.";

#[utoipa::path(
    post, path = "/items", tag = "items",
    request_body = crate::openapi::ItemDoc,
    responses(
        (status = 200, description = "Inserted", body = crate::openapi::InsertResultDoc),
        (status = 500, description = "Insert Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<Item>,
) -> Result<Json<InsertResult>, JsonApiError> {
    let result = state.items.insert(input).await.map_err(JsonApiError::internal)?;
    info!(id = %result.inserted_id, "created item");
    Ok(Json(result))
}

#[utoipa::path(
    get, path = "/items", tag = "items",
    responses(
        (status = 200, description = "Every stored item", body = [crate::openapi::ItemDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state.items.find_all().await.map_err(JsonApiError::internal)?;
    info!(count = items.len(), "list items");
    Ok(Json(items))
}

#[utoipa::path(
    patch, path = "/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ObjectId (hex)")),
    request_body = crate::openapi::ItemDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UpdateResultDoc),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(fields): Json<Item>,
) -> Result<Json<UpdateResult>, Response> {
    let oid = item::parse_id(&id).map_err(|e| JsonApiError::bad_request(e.to_string()).into_response())?;
    match update_existing(state.items.as_ref(), &oid, fields).await {
        Ok(result) => {
            info!(%id, modified = result.modified_count, "updated item");
            Ok(Json(result))
        }
        Err(ServiceError::NotFound(_)) => {
            warn!(%id, "update target not found");
            Err((StatusCode::NOT_FOUND, NOT_FOUND_TEXT).into_response())
        }
        Err(e) => {
            error!(%id, err = %e, "update item failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED_TEXT).into_response())
        }
    }
}

#[utoipa::path(
    delete, path = "/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ObjectId (hex)")),
    responses(
        (status = 200, description = "Deletion result", body = crate::openapi::DeleteResultDoc),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, JsonApiError> {
    let oid = item::parse_id(&id).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    let result = state.items.delete_by_id(&oid).await.map_err(JsonApiError::internal)?;
    info!(%id, deleted = result.deleted_count, "delete item");
    Ok(Json(result))
}
