//! Micro Frontend Host demo.
//!
//! Loads both remotes into the process page and drives the three channels
//! between them: props callbacks, the `mf:add-todo` page event, and the
//! shared store. Works with or without the API running.

use mfe_client::ApiClient;
use mfe_host::{
    DEFAULT_LOG_FILTER, HEADING, HostApp, HostConfig, REMOTE1_APP, REMOTE2_APP, ViewMode,
    bundled_remotes,
};
use mfe_remote1::CounterApp;
use mfe_remote2::TodoListApp;
use mfe_runtime::{ModuleFederation, Page};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    mfe_core::telemetry::init_tracing(DEFAULT_LOG_FILTER);

    let config = HostConfig::from_env()?;
    tracing::info!(
        api = %config.api_base,
        remotes = ?config.remotes.remotes(),
        "Starting {HEADING}"
    );

    let client = ApiClient::new(&config.api_base)?;
    let federation = ModuleFederation::new(config.remotes, Arc::new(bundled_remotes(client)));
    let mut host = HostApp::new(Page::global(), federation);

    host.navigate(ViewMode::Both).await?;
    host.login("demo")?;

    if let Some(counter) = host.component_as_mut::<CounterApp>(REMOTE1_APP) {
        counter.increment();
        counter.increment();
        tracing::info!(greeting = %counter.greeting(), "counter ready");
        counter.post_message("hello from remote1")?;
        counter.request_todo("buy milk")?;
    }
    host.broadcast("hello from the host")?;

    tracing::info!(count = ?host.last_count(), messages = host.messages_seen(), "host state");

    if let Some(list) = host.component_as::<TodoListApp>(REMOTE2_APP) {
        for todo in list.todos() {
            tracing::info!(
                id = todo.id,
                text = %todo.text,
                completed = todo.completed,
                source = ?todo.source,
                "todo"
            );
        }
    }
    for message in host.store().snapshot().messages {
        tracing::info!(id = message.id, from = %message.from, text = %message.text, "message");
    }

    host.navigate(ViewMode::Home).await?;
    host.logout();
    tracing::info!("Demo finished");
    Ok(())
}
