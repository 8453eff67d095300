//! Integration tests for the /api/users endpoints.
//!
//! The router runs against the in-memory store, so no database is needed.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use roster_engine::UserRecord;
use roster_server::db::MemoryUserStore;
use roster_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> (Router, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let router = build_router(AppState::new(store.clone()), Duration::from_secs(5));
    (router, store)
}

async fn call(app: &Router, method: Method, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri("/api/users")
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn list(app: &Router) -> Vec<UserRecord> {
    let (status, body) = call(app, Method::GET, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn create_update_delete_scenario() {
    let (app, _) = app();

    let (status, body) = call(
        &app,
        Method::POST,
        Some(json!({"name": "John", "age": 28, "email": "john@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created");
    let created: UserRecord = serde_json::from_value(body["user"].clone()).unwrap();
    assert_eq!(created.name, "John");

    assert_eq!(list(&app).await, vec![created.clone()]);

    let (status, body) = call(&app, Method::PUT, Some(json!({"id": created.id, "age": 29}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User updated"}));

    let users = list(&app).await;
    assert_eq!(users[0].age, 29);
    assert_eq!(users[0].name, "John");
    assert_eq!(users[0].email, "john@example.com");

    let (status, body) = call(&app, Method::DELETE, Some(json!({"id": created.id}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "User deleted"}));
    assert!(list(&app).await.iter().all(|u| u.id != created.id));
}

#[tokio::test]
async fn created_ids_are_unique() {
    let (app, _) = app();
    let mut ids = Vec::new();

    for _ in 0..3 {
        let (_, body) = call(
            &app,
            Method::POST,
            Some(json!({"name": "Same", "age": 1, "email": "same@example.com"})),
        )
        .await;
        ids.push(body["user"]["id"].as_i64().unwrap());
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, _) = app();
    let (_, body) = call(
        &app,
        Method::POST,
        Some(json!({"name": "Jane", "age": 32, "email": "jane@example.com"})),
    )
    .await;
    let id = body["user"]["id"].clone();

    let (first, _) = call(&app, Method::DELETE, Some(json!({"id": id}))).await;
    let (second, body) = call(&app, Method::DELETE, Some(json!({"id": id}))).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");
}

#[tokio::test]
async fn update_of_missing_user_is_generic_500() {
    let (app, _) = app();
    let (status, body) = call(&app, Method::PUT, Some(json!({"id": 404, "name": "Ghost"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to update user"}));
}

#[tokio::test]
async fn store_failures_are_generic_500() {
    let (app, store) = app();
    store.set_failing(true);

    let cases = [
        (Method::GET, None, "Failed to fetch users"),
        (
            Method::POST,
            Some(json!({"name": "A", "age": 1, "email": "a@example.com"})),
            "Failed to create user",
        ),
        (
            Method::PUT,
            Some(json!({"id": 1, "age": 2})),
            "Failed to update user",
        ),
        (Method::DELETE, Some(json!({"id": 1})), "Failed to delete user"),
    ];

    for (method, body, message) in cases {
        let (status, response) = call(&app, method, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response, json!({ "error": message }));
    }
}

#[tokio::test]
async fn slow_store_times_out_with_500() {
    let store = Arc::new(MemoryUserStore::new());
    store.set_latency(Duration::from_millis(500));
    let app = build_router(AppState::new(store), Duration::from_millis(50));

    let (status, _) = call(&app, Method::GET, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _) = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}
