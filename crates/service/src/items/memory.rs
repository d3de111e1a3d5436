use async_trait::async_trait;
use bson::oid::ObjectId;
use serde_json::Value;
use tokio::sync::RwLock;

use models::item::{DeleteResult, InsertResult, Item, UpdateResult, ID_FIELD};

use crate::errors::ServiceError;
use crate::items::repository::ItemRepository;

/// Process-local item store with the same observable behaviour as the MongoDB
/// collection for top-level fields. Dotted `$set` paths are stored as literal keys.
#[derive(Default)]
pub struct MemoryItemRepository {
    inner: RwLock<Vec<Item>>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

fn id_value(id: &ObjectId) -> Value {
    Value::String(id.to_hex())
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn insert(&self, mut item: Item) -> Result<InsertResult, ServiceError> {
        let mut items = self.inner.write().await;
        let id = match item.get(ID_FIELD) {
            Some(existing) => {
                if items.iter().any(|i| i.get(ID_FIELD) == Some(existing)) {
                    return Err(ServiceError::Connectivity(format!("duplicate key: {existing}")));
                }
                existing.clone()
            }
            None => {
                let id = id_value(&ObjectId::new());
                item.insert(ID_FIELD.to_string(), id.clone());
                id
            }
        };
        items.push(item);
        Ok(InsertResult::new(id))
    }

    async fn find_all(&self) -> Result<Vec<Item>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn update_by_id(&self, id: &ObjectId, fields: Item) -> Result<UpdateResult, ServiceError> {
        let key = id_value(id);
        let mut items = self.inner.write().await;
        let Some(target) = items.iter_mut().find(|i| i.get(ID_FIELD) == Some(&key)) else {
            return Ok(UpdateResult::new(0, 0));
        };
        if fields.contains_key(ID_FIELD) {
            return Err(ServiceError::Connectivity("the _id field is immutable".into()));
        }

        let mut modified = false;
        for (k, v) in fields {
            if target.get(&k) != Some(&v) {
                target.insert(k, v);
                modified = true;
            }
        }
        Ok(UpdateResult::new(1, u64::from(modified)))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<DeleteResult, ServiceError> {
        let key = id_value(id);
        let mut items = self.inner.write().await;
        let before = items.len();
        if let Some(pos) = items.iter().position(|i| i.get(ID_FIELD) == Some(&key)) {
            items.remove(pos);
        }
        Ok(DeleteResult::new((before - items.len()) as u64))
    }
}
