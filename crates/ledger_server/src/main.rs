//! ledger_server: standalone REST server for the inventory ledger.
//!
//! Configuration is read from the environment (and `.env`, if present);
//! see [`ledger_server::config`].

use std::sync::Arc;

use anyhow::Context;
use ledger_core::memory::MemoryRecordStore;
use ledger_core::ports::RecordStore;
use ledger_core::{LedgerService, LedgerServiceImpl};
use ledger_postgres::PgRecordStore;
use ledger_server::config::{DatabaseBackend, ServerConfig};
use ledger_server::router::build_router;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledger_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn RecordStore> = match &config.database {
        DatabaseBackend::Postgres(url) => {
            Arc::new(PgRecordStore::connect(url, config.max_connections).await?)
        }
        DatabaseBackend::Memory => {
            tracing::warn!("using in-memory record store; data is lost on exit");
            Arc::new(MemoryRecordStore::new())
        }
    };
    tracing::info!(backend = config.database.kind(), "record store ready");

    let service: Arc<dyn LedgerService> = Arc::new(LedgerServiceImpl::new(Arc::clone(&store)));
    let app = build_router(service);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("ledger_server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("ledger_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
