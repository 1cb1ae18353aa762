//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against the
//! in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cache_admin::{api::create_router, AppState, Config, MemoryStore};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, MemoryStore) {
    let config = Config::default();
    let store = MemoryStore::from_config(&config);
    let state = AppState::new(store.clone(), &config);
    (create_router(state), store)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn seed(store: &MemoryStore, pairs: &[(&str, &str)]) {
    for (key, value) in pairs {
        store.set(*key, *value, None).await.unwrap();
    }
}

// == SET / GET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"test_key","value":"test_value"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_get_endpoint_success() {
    let (app, store) = create_test_app();
    seed(&store, &[("greeting", "hello")]).await;

    let (status, json) = send(&app, "GET", "/get/greeting", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "greeting");
    assert_eq!(json["value"], "hello");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/get/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_get_hash_key_is_wrong_type() {
    let (app, _) = create_test_app();
    let (status, _) = send(
        &app,
        "PUT",
        "/hset",
        Some(r#"{"key":"user:1","field":"profile","value":"{}"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "GET", "/get/user:1", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("WRONGTYPE"));
}

// == Key Listing Tests ==

#[tokio::test]
async fn test_keys_endpoint_lists_namespace() {
    let (app, store) = create_test_app();
    seed(
        &store,
        &[("orders:1", "a"), ("orders:2", "b"), ("users:1", "c")],
    )
    .await;

    let (status, json) = send(&app, "GET", "/keys?namespace=orders", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pattern"], "orders*");
    assert_eq!(json["count"], 2);
    assert_eq!(json["keys"], serde_json::json!(["orders:1", "orders:2"]));
}

#[tokio::test]
async fn test_keys_endpoint_with_sub_prefix() {
    let (app, store) = create_test_app();
    seed(&store, &[("orders:eu:1", "a"), ("orders:us:1", "b")]).await;

    let (status, json) = send(&app, "GET", "/keys?namespace=orders&prefix=eu", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pattern"], "orders:eu*");
    assert_eq!(json["keys"], serde_json::json!(["orders:eu:1"]));
}

#[tokio::test]
async fn test_keys_endpoint_empty_match_is_ok() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/keys?namespace=nothing", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_keys_endpoint_unreachable_store() {
    let (app, store) = create_test_app();
    store.set_available(false);

    let (status, json) = send(&app, "GET", "/keys?namespace=orders", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json.get("error").is_some());
}

// == Aggregate Tests ==

#[tokio::test]
async fn test_values_endpoint_returns_raw_strings() {
    let (app, store) = create_test_app();
    seed(&store, &[("cfg:a", "plain text"), ("cfg:b", "{\"x\":1}")]).await;

    let (status, json) = send(&app, "GET", "/values?namespace=cfg", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["values"]["cfg:a"], "plain text");
    assert_eq!(json["values"]["cfg:b"], "{\"x\":1}");
}

#[tokio::test]
async fn test_json_values_endpoint_skips_undecodable() {
    let (app, store) = create_test_app();
    seed(
        &store,
        &[
            ("orders:1", r#"{"total":10}"#),
            ("orders:2", "not json"),
            ("orders:3", r#"{"total":30}"#),
        ],
    )
    .await;

    let (status, json) = send(&app, "GET", "/values/json?namespace=orders", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["values"]["orders:1"]["total"], 10);
    assert!(json["values"].get("orders:2").is_none());
}

#[tokio::test]
async fn test_hashes_endpoint_reads_one_field() {
    let (app, store) = create_test_app();
    store
        .set_hash_field("user:1", "profile", r#"{"name":"ada"}"#, None)
        .await
        .unwrap();
    store
        .set_hash_field("user:2", "settings", r#"{"dark":true}"#, None)
        .await
        .unwrap();

    let (status, json) = send(&app, "GET", "/hashes?namespace=user&field=profile", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["values"]["user:1"]["name"], "ada");
}

// == Delete / Flush Tests ==

#[tokio::test]
async fn test_delete_keys_endpoint() {
    let (app, store) = create_test_app();
    seed(&store, &[("sess:1", "a"), ("sess:2", "b"), ("user:1", "c")]).await;

    let (status, json) = send(&app, "DELETE", "/keys?namespace=sess", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pattern"], "sess*");
    assert_eq!(json["matched"], 2);
    assert_eq!(json["deleted"], 2);
    assert_eq!(json["failed"], 0);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_delete_keys_fire_and_forget() {
    let (app, store) = create_test_app();
    seed(&store, &[("tmp:1", "a"), ("tmp:2", "b")]).await;

    let (status, _) = send(
        &app,
        "DELETE",
        "/keys?namespace=tmp&fire_and_forget=true",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_delete_keys_requires_namespace() {
    let (app, store) = create_test_app();
    seed(&store, &[("a", "1")]).await;

    let (status, _) = send(&app, "DELETE", "/keys?namespace=*", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_flush_endpoint_then_list_is_empty() {
    let (app, store) = create_test_app();
    seed(&store, &[("a:1", "1"), ("b:1", "2")]).await;

    let (status, json) = send(&app, "POST", "/flush", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(json.get("requested_at").is_some());

    let (status, json) = send(&app, "GET", "/keys?namespace=a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_flush_endpoint_accepted_when_unreachable() {
    let (app, store) = create_test_app();
    store.set_available(false);

    let (status, _) = send(&app, "POST", "/flush", None).await;

    assert_eq!(status, StatusCode::ACCEPTED);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 422 for JSON parsing errors by default
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "PUT", "/set", Some(r#"{"key":"","value":"test"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let (app, _) = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/set",
        Some(r#"{"key":"ttl_test","value":"expires_soon","ttl":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (status, _) = send(&app, "GET", "/get/ttl_test", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app, "GET", "/keys?namespace=ttl", None).await;
    assert_eq!(json["count"], 0);
}
