use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_store::{Credentials, MemoryTodoStore, MongoTodoStore, StoreConfig, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the backend: `TODO_STORE=memory`, a JSON credentials file named by
/// `TODO_CREDENTIALS_FILE`, or `MONGO_*` environment variables.
fn build_store() -> anyhow::Result<Box<dyn TodoStore>> {
    if std::env::var("TODO_STORE").is_ok_and(|v| v == "memory") {
        return Ok(Box::new(MemoryTodoStore::new()));
    }
    let config = match std::env::var("TODO_CREDENTIALS_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading credentials file {path}"))?;
            let credentials = Credentials::from_json(&raw)
                .with_context(|| format!("parsing credentials file {path}"))?;
            StoreConfig::new(credentials).with_env_overrides()
        }
        Err(_) => StoreConfig::from_env(),
    };
    Ok(Box::new(MongoTodoStore::new(config)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_store=debug,mongodb=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut store = build_store()?;
    store.init().await.context("initializing todo store")?;
    tracing::info!(backend = store.backend_name(), "todo store ready");
    let store: Arc<dyn TodoStore> = Arc::from(store);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, todo_server::app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
