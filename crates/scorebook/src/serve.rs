//! Server bootstrap: storage, roster, HTTP listener, graceful shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use ledger::{FileStore, MemoryStore, SnapshotStore};
use scoreconf::{ScoreConfig, StorageBackend};
use tracing::info;

use crate::http::{router, AppState};
use crate::roster::Roster;

/// Open the snapshot store the configuration asks for.
pub fn open_store(config: &ScoreConfig) -> Result<Arc<dyn SnapshotStore>> {
    let store: Arc<dyn SnapshotStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => {
            let path = config.storage.file_path(&config.paths);
            let store = FileStore::new(&path)
                .with_context(|| format!("Failed to open database file {}", path.display()))?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Run the HTTP server until SIGINT/SIGTERM, then drain pending saves.
pub async fn run(config: ScoreConfig) -> Result<()> {
    info!("🎳 Scorebook starting");

    let store = open_store(&config)?;
    info!("   Storage: {} ({})", store.describe(), config.storage.save_policy);

    let roster = Roster::open(store, config.storage.save_policy, config.auth.hash_cost)
        .context("Failed to load roster from storage")?;
    let roster = Arc::new(roster);

    let app = router(AppState::new(Arc::clone(&roster)));

    let addr = config.bind.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🎳 Scorebook ready!");
    info!("   API: http://{}/", addr);
    info!("   Health: GET http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Flushing pending saves...");
    roster.flush().await;
    let stats = roster.persister().stats();
    info!(
        saves_ok = stats.succeeded(),
        saves_failed = stats.failed(),
        "Shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down...");
        }
        _ = sigterm() => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}

#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
