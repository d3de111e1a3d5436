use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::debug;

use models::item::{self, DeleteResult, InsertResult, Item, UpdateResult};

use crate::errors::ServiceError;
use crate::items::repository::ItemRepository;

/// MongoDB-backed repository over one collection.
#[derive(Clone)]
pub struct MongoItemRepository {
    collection: Collection<Document>,
}

impl MongoItemRepository {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    async fn insert(&self, item: Item) -> Result<InsertResult, ServiceError> {
        let doc = item::to_document(&item)?;
        let res = self.collection.insert_one(doc, None).await?;
        debug!(id = ?res.inserted_id, "inserted item");
        Ok(res.into())
    }

    async fn find_all(&self) -> Result<Vec<Item>, ServiceError> {
        let cursor = self.collection.find(None, None).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(item::from_document).collect())
    }

    async fn update_by_id(&self, id: &ObjectId, fields: Item) -> Result<UpdateResult, ServiceError> {
        let filter = item::id_filter(id);
        // the server rejects an empty $set; report the match without writing
        if fields.is_empty() {
            let matched = self.collection.count_documents(filter, None).await?;
            return Ok(UpdateResult::new(matched, 0));
        }
        let update = doc! { "$set": item::to_document(&fields)? };
        let res = self.collection.update_one(filter, update, None).await?;
        Ok(res.into())
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, ServiceError> {
        let res = self.collection.delete_one(item::id_filter(id), None).await?;
        Ok(res.into())
    }
}
