mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bson::oid::ObjectId;
use serde_json::{json, Value};
use tower::ServiceExt;

use service::items::ItemRepository;
use support::{app, json, send};

async fn insert(app: &axum::Router, body: Value) -> String {
    let (status, bytes) = send(app, "POST", "/items", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let res = json(&bytes);
    assert_eq!(res["acknowledged"], true);
    res["insertedId"].as_str().expect("hex id").to_string()
}

#[tokio::test]
async fn root_returns_placeholder_text() {
    let (app, _) = app().await;
    let (status, bytes) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&bytes[..], b"Simple CRUD Template");
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app().await;
    let (status, bytes) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes)["status"], "ok");
}

#[tokio::test]
async fn created_item_is_listed() {
    let (app, _) = app().await;
    let id = insert(&app, json!({"title": "sunrise", "tags": ["sky"]})).await;

    let (status, bytes) = send(&app, "GET", "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = json(&bytes);
    let listed = items
        .as_array()
        .expect("array")
        .iter()
        .find(|i| i["_id"] == id.as_str())
        .expect("inserted item listed");
    assert_eq!(listed["title"], "sunrise");
    assert_eq!(listed["tags"], json!(["sky"]));
}

#[tokio::test]
async fn patch_merges_fields_and_keeps_the_rest() {
    let (app, repo) = app().await;
    let id = insert(&app, json!({"a": 0, "b": "untouched"})).await;

    let (status, bytes) = send(&app, "PATCH", &format!("/items/{id}"), Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::OK);
    let res = json(&bytes);
    assert_eq!(res["matchedCount"], 1);
    assert_eq!(res["modifiedCount"], 1);

    let stored = repo.find_all().await.unwrap();
    assert_eq!(stored[0]["a"], 1);
    assert_eq!(stored[0]["b"], "untouched");
}

#[tokio::test]
async fn patch_unknown_id_is_not_found_and_changes_nothing() {
    let (app, repo) = app().await;
    insert(&app, json!({"a": 0})).await;
    let before = repo.find_all().await.unwrap();

    let missing = ObjectId::new().to_hex();
    let (status, bytes) = send(&app, "PATCH", &format!("/items/{missing}"), Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&bytes[..], b"No document found for the provided ID.");
    assert_eq!(repo.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let (app, _) = app().await;
    let (status, bytes) = send(&app, "PATCH", "/items/xyz", Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&bytes)["error"].as_str().unwrap().contains("xyz"));

    let (status, _) = send(&app, "DELETE", "/items/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_item_from_listing() {
    let (app, _) = app().await;
    let gone = insert(&app, json!({"n": 1})).await;
    let kept = insert(&app, json!({"n": 2})).await;

    let (status, bytes) = send(&app, "DELETE", &format!("/items/{gone}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes), json!({"acknowledged": true, "deletedCount": 1}));

    let (_, bytes) = send(&app, "GET", "/items", None).await;
    let ids: Vec<Value> = json(&bytes)
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["_id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(kept)]);

    let (status, bytes) = send(&app, "DELETE", &format!("/items/{gone}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes)["deletedCount"], 0);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _) = app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/items")
        .header("origin", "http://frontend.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn serves_openapi_document() {
    let (app, _) = app().await;
    let (status, bytes) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let doc = json(&bytes);
    assert!(doc["paths"]["/items/{id}"].is_object());
}

#[tokio::test]
async fn store_failures_return_generic_500_bodies() {
    let app = support::app_with_repo(support::CLOSED_PORT_BASE, Arc::new(support::FailingRepository));
    let error_body = json!({"error": "An error occurred"});

    let (status, bytes) = send(&app, "POST", "/items", Some(json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&bytes), error_body);

    let (status, bytes) = send(&app, "GET", "/items", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&bytes), error_body);

    let id = ObjectId::new().to_hex();
    let (status, bytes) = send(&app, "DELETE", &format!("/items/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&bytes), error_body);

    let (status, bytes) = send(&app, "PATCH", &format!("/items/{id}"), Some(json!({"a": 2}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&bytes[..], b"An error occurred while updating the document.");
}

#[tokio::test]
async fn patch_that_sets_id_fails_and_leaves_item_untouched() {
    let (app, repo) = app().await;
    let id = insert(&app, json!({"a": 0})).await;

    let (status, bytes) = send(&app, "PATCH", &format!("/items/{id}"), Some(json!({"_id": id, "a": 1}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&bytes[..], b"An error occurred while updating the document.");
    assert_eq!(repo.find_all().await.unwrap()[0]["a"], 0);
}
