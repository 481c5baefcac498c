//! Student API Tests
//!
//! Drives the full Axum router in-process:
//! - Status codes for every route
//! - Request validation before the service is reached
//! - Partial update semantics
//! - Cached reads never outlive a mutation

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use student_registry::cache::{MemoryCache, StudentCache};
use student_registry::http_server::{build_router, HttpServerConfig};
use student_registry::storage::{MemoryStore, SqliteStore, StudentStore};
use student_registry::student::StudentService;

// =============================================================================
// Helper Functions
// =============================================================================

fn app_with(store: Arc<dyn StudentStore>, cache: Arc<dyn StudentCache>) -> Router {
    let service = Arc::new(StudentService::new(store, cache));
    build_router(&HttpServerConfig::default(), service)
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()), Arc::new(MemoryCache::new()))
}

fn alice() -> Value {
    json!({"name": "Alice", "age": 20, "className": "10A", "phoneNumber": "1234567890"})
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn insert(app: &Router, body: Value) -> i64 {
    let (status, created) = send(app, "POST", "/api/students/insert", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().unwrap()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_insert_returns_created_record() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/students/insert", Some(alice())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["age"], 20);
    assert_eq!(body["className"], "10A");
    assert_eq!(body["phoneNumber"], "1234567890");
}

#[tokio::test]
async fn test_insert_then_fetch_all_contains_exactly_one() {
    let app = app();
    let id = insert(&app, alice()).await;

    let (status, body) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = alice();
    expected["id"] = json!(id);
    assert_eq!(body, json!([expected]));
}

#[tokio::test]
async fn test_insert_rejects_age_out_of_range() {
    let app = app();
    let mut payload = alice();
    payload["age"] = json!(200);

    let (status, body) = send(&app, "POST", "/api/students/insert", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["details"][0]["field"], "age");
    assert_eq!(body["details"][0]["message"], "Age must be less than 100");

    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_insert_rejects_short_phone() {
    let app = app();
    let mut payload = alice();
    payload["phoneNumber"] = json!("12345");

    let (status, body) = send(&app, "POST", "/api/students/insert", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["message"], "Phone number must be 10 digits");
}

#[tokio::test]
async fn test_insert_rejects_missing_and_blank_fields() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/students/insert",
        Some(json!({"name": "  ", "age": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "className", "phoneNumber"]);
}

#[tokio::test]
async fn test_insert_rejects_malformed_json() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/students/insert")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // wrong type for age
    let (status, _) = send(
        &app,
        "POST",
        "/api/students/insert",
        Some(json!({"name": "A", "age": "twenty", "className": "1", "phoneNumber": "1234567890"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insert_requires_json_content_type() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/students/insert")
        .body(Body::from(alice().to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = app();
    for name in ["John", "joanna", "Mike"] {
        let mut payload = alice();
        payload["name"] = json!(name);
        insert(&app, payload).await;
    }

    let (status, body) = send(&app, "GET", "/api/students/search?name=jo", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["John", "joanna"]);

    let (_, body) = send(&app, "GET", "/api/students/search?name=KE", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_requires_non_blank_name() {
    let app = app();
    let (status, _) = send(&app, "GET", "/api/students/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/students/search?name=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: name");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_is_partial() {
    let app = app();
    let id = insert(&app, alice()).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"age": 21, "name": "", "className": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["age"], 21);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["className"], "10A");
}

#[tokio::test]
async fn test_update_with_empty_body_changes_nothing() {
    let app = app();
    let id = insert(&app, alice()).await;

    let (status, body) = send(&app, "PUT", &format!("/api/students/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = alice();
    expected["id"] = json!(id);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn test_update_validates_supplied_fields() {
    let app = app();
    let id = insert(&app, alice()).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"phoneNumber": "12345"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all[0]["phoneNumber"], "1234567890");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = app();
    let (status, body) = send(&app, "PUT", "/api/students/77", Some(json!({"age": 30}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_update_rejects_bad_ids() {
    let app = app();
    for uri in ["/api/students/0", "/api/students/-3", "/api/students/abc"] {
        let (status, _) = send(&app, "PUT", uri, Some(json!({"age": 30}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_insert_delete_delete_scenario() {
    let app = app();
    let id = insert(&app, alice()).await;
    assert!(id > 0);

    let uri = format!("/api/students/{}", id);
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_rejects_bad_ids() {
    let app = app();
    let (status, _) = send(&app, "DELETE", "/api/students/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "DELETE", "/api/students/x1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Cache consistency
// =============================================================================

#[tokio::test]
async fn test_cached_reads_reflect_every_mutation() {
    let app = app();
    let id = insert(&app, alice()).await;

    // warm both cached query shapes
    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    let (_, found) = send(&app, "GET", "/api/students/search?name=ali", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let mut bob = alice();
    bob["name"] = json!("Alibek");
    insert(&app, bob).await;
    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    let (_, found) = send(&app, "GET", "/api/students/search?name=ali", None).await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"name": "Zed"})),
    )
    .await;
    let (_, found) = send(&app, "GET", "/api/students/search?name=ali", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    send(&app, "DELETE", &format!("/api/students/{}", id), None).await;
    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["name"], "Alibek");
}

#[tokio::test]
async fn test_sqlite_backed_round_trip() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app_with(store, Arc::new(MemoryCache::new()));

    let id = insert(&app, alice()).await;
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/students/{}", id),
        Some(json!({"className": "11C"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["className"], "11C");

    let (_, all) = send(&app, "GET", "/api/students/fetch", None).await;
    assert_eq!(all[0]["className"], "11C");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
