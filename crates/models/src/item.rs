//! Schema-less item documents.
//!
//! Items travel as JSON objects over HTTP and as BSON documents inside the
//! driver. The only field with meaning is `_id`, which is an ObjectId in the
//! store and a 24 character hex string on the wire.

use bson::{doc, oid::ObjectId, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Name of the identifier field assigned by the store.
pub const ID_FIELD: &str = "_id";

/// An arbitrary JSON object.
pub type Item = Map<String, Value>;

/// Parse a path segment into an ObjectId.
pub fn parse_id(raw: &str) -> Result<ObjectId, ModelError> {
    ObjectId::parse_str(raw).map_err(|_| ModelError::InvalidId(raw.to_string()))
}

/// Filter matching exactly one document by identifier.
pub fn id_filter(id: &ObjectId) -> Document {
    doc! { "_id": *id }
}

/// Convert a JSON object into a BSON document.
pub fn to_document(item: &Item) -> Result<Document, ModelError> {
    bson::to_document(item).map_err(|e| ModelError::Conversion(e.to_string()))
}

/// Convert a stored document back into a JSON object.
pub fn from_document(doc: Document) -> Item {
    doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect()
}

/// Relaxed extended JSON, except ObjectIds which render as plain hex strings.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(from_document(doc)),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Acknowledgement of a single insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

impl InsertResult {
    pub fn new(inserted_id: Value) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}

impl From<mongodb::results::InsertOneResult> for InsertResult {
    fn from(r: mongodb::results::InsertOneResult) -> Self {
        Self::new(bson_to_json(r.inserted_id))
    }
}

/// Outcome of a single-document `$set`. `matched_count == 0` means the id was unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn is_miss(&self) -> bool {
        self.matched_count == 0
    }
}

impl From<mongodb::results::UpdateResult> for UpdateResult {
    fn from(r: mongodb::results::UpdateResult) -> Self {
        let upserted_id = r.upserted_id.map(bson_to_json);
        Self {
            acknowledged: true,
            matched_count: r.matched_count,
            modified_count: r.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}

impl From<mongodb::results::DeleteResult> for DeleteResult {
    fn from(r: mongodb::results::DeleteResult) -> Self {
        Self::new(r.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn parse_id_accepts_hex_and_rejects_garbage() {
        let oid = ObjectId::new();
        assert_eq!(parse_id(&oid.to_hex()).unwrap(), oid);
        assert!(matches!(parse_id("not-an-id"), Err(ModelError::InvalidId(s)) if s == "not-an-id"));
        assert!(parse_id("").is_err());
    }

    #[test]
    fn json_document_conversion_keeps_nested_shape() {
        let original = item(json!({
            "name": "sunset",
            "n": 1,
            "ratio": 7.5,
            "tags": ["a", "b"],
            "meta": { "safe": true, "seed": null }
        }));
        let doc = to_document(&original).expect("to bson");
        assert_eq!(doc.get_str("name").unwrap(), "sunset");
        let back = from_document(doc);
        assert_eq!(Value::Object(back), Value::Object(original));
    }

    #[test]
    fn object_ids_render_as_hex_strings() {
        let oid = ObjectId::new();
        let doc = doc! { "_id": oid, "refs": [oid], "inner": { "owner": oid } };
        let json = Value::Object(from_document(doc));
        assert_eq!(json["_id"], Value::String(oid.to_hex()));
        assert_eq!(json["refs"][0], Value::String(oid.to_hex()));
        assert_eq!(json["inner"]["owner"], Value::String(oid.to_hex()));
    }

    #[test]
    fn id_filter_targets_the_id_field() {
        let oid = ObjectId::new();
        assert_eq!(id_filter(&oid).get_object_id(ID_FIELD).unwrap(), oid);
    }

    #[test]
    fn results_serialize_like_driver_acknowledgements() {
        let insert = serde_json::to_value(InsertResult::new(json!("abc"))).unwrap();
        assert_eq!(insert, json!({"acknowledged": true, "insertedId": "abc"}));

        let update = serde_json::to_value(UpdateResult::new(1, 1)).unwrap();
        assert_eq!(
            update,
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 1,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
        assert!(UpdateResult::new(0, 0).is_miss());

        let delete = serde_json::to_value(DeleteResult::new(1)).unwrap();
        assert_eq!(delete, json!({"acknowledged": true, "deletedCount": 1}));
    }
}
