//! HTTP-level tests for the API router.
//!
//! Most tests run against `InMemoryRepository`; the `sqlite_*` tests drive
//! the same router over a migrated in-memory SQLite database.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use mfe_core::types::{HealthResponse, Message, Origin, SuccessResponse, Todo};
use mfe_sqlite::SqliteRepository;
use mfe_testing::InMemoryRepository;
use mfe_web::config::Config;
use mfe_web::{AppState, CORRELATION_ID_HEADER, ErrorBody, build_router};
use serde_json::json;
use std::sync::Arc;

fn server_with(repo: Arc<InMemoryRepository>) -> TestServer {
    let state = AppState::from_repository(repo);
    let app = build_router(state, &Config::default().cors_origins);
    TestServer::new(app).expect("router should build a test server")
}

fn server() -> TestServer {
    server_with(Arc::new(InMemoryRepository::new()))
}

async fn create_todo(server: &TestServer, text: &str) -> Todo {
    let response = server.post("/todos").json(&json!({ "text": text })).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Todo>()
}

#[tokio::test]
async fn root_returns_banner() {
    let response = server().get("/").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<HealthResponse>(),
        HealthResponse {
            status: "ok".to_string(),
            message: "Micro Frontend API".to_string(),
        }
    );
}

#[tokio::test]
async fn health_reflects_database_state() {
    let repo = Arc::new(InMemoryRepository::new());
    let server = server_with(repo.clone());

    server.get("/health").await.assert_status_ok();

    repo.set_unavailable(true);
    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<ErrorBody>().error, "Database unavailable");
}

#[tokio::test]
async fn create_todo_echoes_text_with_fresh_id() {
    let server = server();

    let first = create_todo(&server, "Learn Micro Frontends").await;
    let second = create_todo(&server, "Build with Module Federation").await;

    assert_eq!(first.text, "Learn Micro Frontends");
    assert!(!first.completed);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn create_todo_serializes_camel_case() {
    let response = server()
        .post("/todos")
        .json(&json!({ "text": "wire format" }))
        .await;

    let body = response.json::<serde_json::Value>();
    assert!(body.get("createdAt").is_some());
    assert!(body.get("created_at").is_none());
    assert_eq!(body["completed"], json!(false));
}

#[tokio::test]
async fn create_todo_rejects_bad_bodies() {
    let server = server();

    for body in [json!({ "text": "   " }), json!({}), json!({ "text": 5 })] {
        let response = server.post("/todos").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(!response.json::<ErrorBody>().error.is_empty());
    }

    let response = server
        .post("/todos")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.post("/todos").text("plain text").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(server.get("/todos").await.json::<Vec<Todo>>().is_empty());
}

#[tokio::test]
async fn list_todos_is_ordered_by_creation() {
    let server = server();
    for text in ["one", "two", "three"] {
        create_todo(&server, text).await;
    }

    let todos = server.get("/todos").await.json::<Vec<Todo>>();

    let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert!(todos.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test]
async fn patch_todo_updates_given_fields() {
    let server = server();
    let todo = create_todo(&server, "toggle me").await;

    let response = server
        .patch(&format!("/todos/{}", todo.id))
        .json(&json!({ "completed": true }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Todo>();
    assert!(updated.completed);
    assert_eq!(updated.text, "toggle me");

    let response = server
        .patch(&format!("/todos/{}", todo.id))
        .json(&json!({}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Todo>(), updated);

    let response = server
        .patch(&format!("/todos/{}", todo.id))
        .json(&json!({ "text": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_todo_is_not_found_with_exact_body() {
    let server = server();

    let patch = server
        .patch("/todos/999")
        .json(&json!({ "completed": true }))
        .await;
    patch.assert_status_not_found();
    patch.assert_json(&json!({ "error": "Not found" }));

    let delete = server.delete("/todos/999").await;
    delete.assert_status_not_found();
    delete.assert_json(&json!({ "error": "Not found" }));
}

#[tokio::test]
async fn malformed_todo_id_is_bad_request() {
    let response = server().delete("/todos/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!response.json::<ErrorBody>().error.is_empty());
}

#[tokio::test]
async fn delete_todo_returns_success() {
    let server = server();
    let todo = create_todo(&server, "short lived").await;

    let response = server.delete(&format!("/todos/{}", todo.id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<SuccessResponse>(), SuccessResponse::OK);

    assert!(server.get("/todos").await.json::<Vec<Todo>>().is_empty());
}

#[tokio::test]
async fn messages_create_list_and_clear() {
    let server = server();

    let response = server
        .post("/messages")
        .json(&json!({ "text": "hello from remote1", "from": "remote1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Message>();
    assert_eq!(created.from, Origin::Remote1);

    server
        .post("/messages")
        .json(&json!({ "text": "hi", "from": "host" }))
        .await
        .assert_status(StatusCode::CREATED);

    let listed = server.get("/messages").await.json::<Vec<Message>>();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], created);

    let response = server.delete("/messages").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));

    assert!(server.get("/messages").await.json::<Vec<Message>>().is_empty());
}

#[tokio::test]
async fn message_with_unknown_origin_is_rejected() {
    let response = server()
        .post("/messages")
        .json(&json!({ "text": "hi", "from": "remote3" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_failure_is_internal_error() {
    let repo = Arc::new(InMemoryRepository::new());
    let server = server_with(repo.clone());
    repo.set_unavailable(true);

    let response = server.get("/todos").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn cors_admits_configured_origins_only() {
    let server = server();
    let origin = HeaderName::from_static("origin");
    let allow = "access-control-allow-origin";

    let allowed = server
        .get("/todos")
        .add_header(origin.clone(), HeaderValue::from_static("http://localhost:3001"))
        .await;
    assert_eq!(
        allowed.headers().get(allow).unwrap(),
        "http://localhost:3001"
    );

    let denied = server
        .get("/todos")
        .add_header(origin, HeaderValue::from_static("http://evil.test"))
        .await;
    assert!(denied.headers().get(allow).is_none());
}

#[tokio::test]
async fn responses_carry_correlation_id() {
    let response = server().get("/").await;
    assert!(response.headers().get(CORRELATION_ID_HEADER).is_some());
}

#[tokio::test]
async fn sqlite_backed_router_round_trip() {
    let repo = SqliteRepository::in_memory().await.unwrap();
    repo.migrate().await.unwrap();
    let state = AppState::from_repository(Arc::new(repo));
    let server = TestServer::new(build_router(state, &Config::default().cors_origins)).unwrap();

    server.get("/health").await.assert_status_ok();

    let created = create_todo(&server, "persisted").await;
    let toggled = server
        .patch(&format!("/todos/{}", created.id))
        .json(&json!({ "completed": true }))
        .await
        .json::<Todo>();
    assert!(toggled.completed);

    let todos = server.get("/todos").await.json::<Vec<Todo>>();
    assert_eq!(todos, vec![toggled]);

    server
        .delete(&format!("/todos/{}", created.id))
        .await
        .assert_status_ok();
    server
        .delete(&format!("/todos/{}", created.id))
        .await
        .assert_status_not_found();
}
