//! Host, remotes and runtime wired together on one page.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use mfe_client::ApiClient;
use mfe_core::event_bus::{AddTodoRequested, CustomEvent, EventBus};
use mfe_core::types::Origin;
use mfe_host::{
    HostApp, HostError, REMOTE1_APP, REMOTE2_APP, ViewMode, bundled_remotes, default_manifest,
};
use mfe_remote1::CounterApp;
use mfe_remote2::{TodoListApp, TodoSource};
use mfe_runtime::{FederationError, FederationManifest, ModuleFederation, Page, SharedStore};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn offline_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal server error" })),
        )
        .mount(&server)
        .await;
    server
}

fn host_with(page: &Page, manifest: FederationManifest, server: &MockServer) -> HostApp {
    let client = ApiClient::new(&server.uri()).unwrap();
    let federation = ModuleFederation::new(manifest, Arc::new(bundled_remotes(client)));
    HostApp::new(page.clone(), federation)
}

fn host(page: &Page, server: &MockServer) -> HostApp {
    host_with(page, default_manifest(), server)
}

#[tokio::test]
async fn starts_home_and_mounts_per_view() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);

    assert_eq!(host.view(), ViewMode::Home);
    assert!(host.mounted_specifiers().is_empty());

    host.navigate(ViewMode::Both).await.unwrap();
    assert_eq!(host.mounted_specifiers(), vec![REMOTE1_APP, REMOTE2_APP]);
    assert!(host.component(REMOTE1_APP).unwrap().is_mounted());

    host.navigate(ViewMode::Remote1).await.unwrap();
    assert_eq!(host.mounted_specifiers(), vec![REMOTE1_APP]);
    assert_eq!(page.events().listener_count(AddTodoRequested::NAME), 0);

    host.navigate(ViewMode::Home).await.unwrap();
    assert!(host.mounted_specifiers().is_empty());
}

#[tokio::test]
async fn staying_on_a_view_keeps_component_state() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);

    host.navigate(ViewMode::Remote1).await.unwrap();
    host.component_as_mut::<CounterApp>(REMOTE1_APP)
        .unwrap()
        .increment();

    host.navigate(ViewMode::Both).await.unwrap();
    assert_eq!(
        host.component_as::<CounterApp>(REMOTE1_APP).unwrap().count(),
        1
    );
}

#[tokio::test]
async fn counter_reports_through_props() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Remote1).await.unwrap();

    let counter = host.component_as_mut::<CounterApp>(REMOTE1_APP).unwrap();
    assert_eq!(counter.title(), "Remote App 1");
    counter.increment();
    counter.increment();
    counter.decrement();

    assert_eq!(host.last_count(), Some(1));
}

#[tokio::test]
async fn add_todo_event_crosses_remotes() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Both).await.unwrap();

    let delivered = host
        .component_as::<CounterApp>(REMOTE1_APP)
        .unwrap()
        .request_todo("buy milk")
        .unwrap();
    assert_eq!(delivered, 1);

    let todos = host
        .component_as::<TodoListApp>(REMOTE2_APP)
        .unwrap()
        .todos();
    let from_event: Vec<_> = todos
        .iter()
        .filter(|t| t.source == TodoSource::Event)
        .collect();
    assert_eq!(from_event.len(), 1);
    assert_eq!(from_event[0].text, "buy milk");
}

#[tokio::test]
async fn add_todo_without_list_reaches_nobody() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Remote1).await.unwrap();

    let delivered = host
        .component_as::<CounterApp>(REMOTE1_APP)
        .unwrap()
        .request_todo("buy milk")
        .unwrap();

    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn all_bundles_share_one_store() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Both).await.unwrap();

    assert!(host.store().ptr_eq(&SharedStore::get_or_create(&page)));

    host.component_as::<CounterApp>(REMOTE1_APP)
        .unwrap()
        .post_message("hi")
        .unwrap();
    host.broadcast("hello all").unwrap();
    assert_eq!(host.messages_seen(), 2);

    let messages = host.store().snapshot().messages;
    assert_eq!(messages[0].from, Origin::Remote1);
    assert_eq!(messages[1].from, Origin::Host);
    assert!(messages[1].id > messages[0].id);

    host.clear_messages();
    assert_eq!(host.messages_seen(), 0);
}

#[tokio::test]
async fn login_is_visible_to_remotes() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Remote1).await.unwrap();

    host.login(" ada ").unwrap();
    assert_eq!(
        host.component_as::<CounterApp>(REMOTE1_APP)
            .unwrap()
            .greeting(),
        "Hello, ada!"
    );

    host.logout();
    assert_eq!(host.store().global_user(), None);
    assert!(matches!(host.login("  "), Err(HostError::Validation(_))));
    assert!(matches!(host.broadcast(""), Err(HostError::Validation(_))));
}

#[tokio::test]
async fn todo_list_loads_from_api_when_mounted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "text": "persisted",
            "completed": false,
            "createdAt": "2025-01-01T00:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    let page = Page::new();
    let mut host = host(&page, &server);

    host.navigate(ViewMode::Remote2).await.unwrap();

    let todos = host
        .component_as::<TodoListApp>(REMOTE2_APP)
        .unwrap()
        .todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].text, "persisted");
    assert_eq!(todos[0].source, TodoSource::Server);
}

#[tokio::test]
async fn failed_load_keeps_current_view() {
    let server = offline_api().await;
    let page = Page::new();
    let manifest = FederationManifest::new()
        .with_remote("remote1", "http://localhost:3001/assets/remoteEntry.js");
    let mut host = host_with(&page, manifest, &server);
    host.navigate(ViewMode::Remote1).await.unwrap();

    let err = host.navigate(ViewMode::Both).await.unwrap_err();

    assert_eq!(
        err,
        HostError::Federation(FederationError::UnknownRemote("remote2".to_string()))
    );
    assert_eq!(host.view(), ViewMode::Remote1);
    assert_eq!(host.mounted_specifiers(), vec![REMOTE1_APP]);
}

#[tokio::test]
async fn dropping_host_unmounts_remotes() {
    let server = offline_api().await;
    let page = Page::new();
    let mut host = host(&page, &server);
    host.navigate(ViewMode::Both).await.unwrap();
    let store = SharedStore::get_or_create(&page);
    assert_eq!(store.subscriber_count(), 2);

    drop(host);

    assert_eq!(store.subscriber_count(), 0);
    assert_eq!(page.events().listener_count(AddTodoRequested::NAME), 0);
}
