use async_trait::async_trait;
use bson::oid::ObjectId;
use models::item::{DeleteResult, InsertResult, Item, UpdateResult};

use crate::errors::ServiceError;

/// Access to the single item collection.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Store `item` as-is; the store assigns `_id` unless the item carries one.
    async fn insert(&self, item: Item) -> Result<InsertResult, ServiceError>;
    /// Every stored item in natural order.
    async fn find_all(&self) -> Result<Vec<Item>, ServiceError>;
    /// Top-level `$set` of `fields` on the item with identifier `id`.
    /// An unknown id is reported through `matched_count == 0`, not as an error.
    async fn update_by_id(&self, id: &ObjectId, fields: Item) -> Result<UpdateResult, ServiceError>;
    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, ServiceError>;
}

/// Like [`ItemRepository::update_by_id`] but turns a miss into `ServiceError::NotFound`.
pub async fn update_existing(
    repo: &dyn ItemRepository,
    id: &ObjectId,
    fields: Item,
) -> Result<UpdateResult, ServiceError> {
    let result = repo.update_by_id(id, fields).await?;
    if result.is_miss() {
        return Err(ServiceError::not_found(&format!("item {id}")));
    }
    Ok(result)
}
