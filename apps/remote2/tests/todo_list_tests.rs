//! Todo list behavior against a wiremock API.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use mfe_client::ApiClient;
use mfe_core::event_bus::{AddTodoRequested, CustomEvent, EventBus, EventBusExt};
use mfe_core::types::Origin;
use mfe_remote2::{TodoListApp, TodoSource, remote_entry, seed_todos};
use mfe_runtime::{Component, MountContext, Page, Props, SharedStore};
use mfe_testing::test_clock;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EPOCH_MILLIS: i64 = 1_735_689_600_000;

fn todo_json(id: i64, text: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "text": text,
        "completed": completed,
        "createdAt": "2025-01-01T00:00:00Z"
    })
}

fn app_for(server: &MockServer) -> TodoListApp {
    let client = ApiClient::new(&server.uri()).unwrap();
    TodoListApp::with_clock(client, Arc::new(test_clock()))
}

async fn failing_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal server error" })),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn starts_from_seed_items() {
    let server = failing_server().await;
    let app = app_for(&server);

    assert_eq!(app.todos(), seed_todos());
    assert_eq!(app.load().await, TodoSource::Seed);
    assert_eq!(app.todos(), seed_todos());
}

#[tokio::test]
async fn load_replaces_seeds_with_server_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            todo_json(7, "from the API", false)
        ])))
        .mount(&server)
        .await;
    let app = app_for(&server);

    assert_eq!(app.load().await, TodoSource::Server);

    let todos = app.todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, 7);
    assert_eq!(todos[0].source, TodoSource::Server);
}

#[tokio::test]
async fn add_persists_through_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({ "text": " padded " })))
        .respond_with(ResponseTemplate::new(201).set_body_json(todo_json(3, " padded ", false)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let item = app.add(" padded ").await.unwrap();

    assert_eq!(item.id, 3);
    assert_eq!(item.text, " padded ");
    assert_eq!(item.source, TodoSource::Server);
    assert_eq!(app.todos().len(), 3);
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    assert!(app.add("   ").await.is_none());
    assert!(app.add("").await.is_none());
    assert_eq!(app.todos().len(), 2);
}

#[tokio::test]
async fn add_falls_back_to_local_item() {
    let server = failing_server().await;
    let app = app_for(&server);

    let first = app.add("offline one").await.unwrap();
    let second = app.add("offline two").await.unwrap();

    assert_eq!(first.source, TodoSource::Local);
    assert_eq!(first.id, EPOCH_MILLIS);
    assert_eq!(second.id, EPOCH_MILLIS + 1);
    assert!(!first.completed);
    assert_eq!(app.todos().len(), 4);
}

#[tokio::test]
async fn toggle_and_delete_local_items_without_api() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let toggled = app.toggle(-1).await.unwrap();
    assert!(toggled.completed);
    assert!(app.toggle(99).await.is_none());

    assert!(app.delete(-2).await);
    assert!(!app.delete(-2).await);
    assert_eq!(app.todos().len(), 1);
}

#[tokio::test]
async fn saved_item_after_failed_load_is_distinct_from_seeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(todo_json(1, "first row", false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(1, "first row", true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_for(&server);

    assert_eq!(app.load().await, TodoSource::Seed);
    app.add("first row").await.unwrap();

    let toggled = app.toggle(1).await.unwrap();
    assert_eq!(toggled.source, TodoSource::Server);
    assert_eq!(toggled.text, "first row");
    assert!(toggled.completed);

    assert!(app.delete(1).await);
    assert_eq!(app.todos(), seed_todos());
}

#[tokio::test]
async fn toggle_server_item_patches_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            todo_json(5, "ship it", false)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/todos/5"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(todo_json(5, "ship it", true)))
        .expect(1)
        .mount(&server)
        .await;
    let app = app_for(&server);
    app.load().await;

    let item = app.toggle(5).await.unwrap();

    assert!(item.completed);
    assert_eq!(item.source, TodoSource::Server);
}

#[tokio::test]
async fn failed_server_calls_still_change_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            todo_json(5, "ship it", false),
            todo_json(6, "tidy up", false)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
        .mount(&server)
        .await;
    let app = app_for(&server);
    app.load().await;

    assert!(app.toggle(5).await.unwrap().completed);
    assert!(app.delete(6).await);

    let todos = app.todos();
    assert_eq!(todos.len(), 1);
    assert!(todos[0].completed);
}

#[tokio::test]
async fn add_todo_event_appends_exactly_one_item() {
    let server = failing_server().await;
    let page = Page::new();
    let mut app = app_for(&server);
    app.mount(MountContext::new(page.clone(), Props::new()));

    let delivered = page
        .events()
        .dispatch(&AddTodoRequested::new("buy milk"))
        .unwrap();

    assert_eq!(delivered, 1);
    let todos = app.todos();
    assert_eq!(todos.len(), 3);
    let added = todos.last().unwrap();
    assert_eq!(added.text, "buy milk");
    assert_eq!(added.source, TodoSource::Event);
    assert!(!added.completed);

    let messages = SharedStore::get_or_create(&page).snapshot().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from, Origin::Remote2);
    assert!(messages[0].text.contains("buy milk"));
}

#[tokio::test]
async fn blank_or_malformed_events_are_ignored() {
    let server = failing_server().await;
    let page = Page::new();
    let mut app = app_for(&server);
    app.mount(MountContext::new(page.clone(), Props::new()));

    page.events()
        .dispatch(&AddTodoRequested::new("  "))
        .unwrap();
    page.events()
        .dispatch_raw(AddTodoRequested::NAME, json!({ "title": "wrong shape" }))
        .unwrap();

    assert_eq!(app.todos().len(), 2);
}

#[tokio::test]
async fn unmount_stops_listening() {
    let server = failing_server().await;
    let page = Page::new();
    let mut app = app_for(&server);
    app.mount(MountContext::new(page.clone(), Props::new()));
    assert_eq!(page.events().listener_count(AddTodoRequested::NAME), 1);

    app.unmount();

    assert_eq!(page.events().listener_count(AddTodoRequested::NAME), 0);
    page.events()
        .dispatch(&AddTodoRequested::new("too late"))
        .unwrap();
    assert_eq!(app.todos().len(), 2);
}

#[tokio::test]
async fn remount_keeps_a_single_listener() {
    let server = failing_server().await;
    let page = Page::new();
    let mut app = app_for(&server);
    app.mount(MountContext::new(page.clone(), Props::new()));
    app.mount(MountContext::new(page.clone(), Props::new()));

    page.events()
        .dispatch(&AddTodoRequested::new("once"))
        .unwrap();

    assert_eq!(app.todos().len(), 3);
}

#[tokio::test]
async fn sync_pending_pushes_local_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({ "text": "from event" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(todo_json(10, "from event", false)))
        .expect(1)
        .mount(&server)
        .await;
    let page = Page::new();
    let mut app = app_for(&server);
    app.mount(MountContext::new(page.clone(), Props::new()));
    page.events()
        .dispatch(&AddTodoRequested::new("from event"))
        .unwrap();

    assert_eq!(app.sync_pending().await, 1);

    let synced = app.todos().into_iter().find(|t| t.id == 10).unwrap();
    assert_eq!(synced.source, TodoSource::Server);
    assert!(app.todos().iter().all(|t| !t.source.is_pending()));
}

#[tokio::test]
async fn entry_builds_list_components() {
    let server = failing_server().await;
    let client = ApiClient::new(&server.uri()).unwrap();
    let entry = remote_entry(client);

    let mut component = entry.instantiate("./App").unwrap();
    assert_eq!(component.name(), "Remote App 2 - Todo List");

    component.mount(MountContext::new(Page::new(), Props::new()));
    component.after_mount().await;

    let app = component.as_any().downcast_ref::<TodoListApp>().unwrap();
    assert_eq!(app.todos(), seed_todos());
}
