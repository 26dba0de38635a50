//! Garage Cache - dashboard API server
//!
//! Serves the garage dashboard endpoints with every read cached in the
//! configured key-value store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garage_cache::api::{create_router, AppState};
use garage_cache::cache::{KvStore, MemoryBackend};
use garage_cache::config::{Config, StoreConfig};
use garage_cache::spawn_cleanup_task;

/// Main entry point for the dashboard API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the configured key-value store (never fatal)
/// 4. Start the expiry sweeper when the store is in-process
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garage_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Garage Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: store={}, store_configured={}, port={}, store_timeout={}ms",
        config.store.kind(),
        config.store_configured,
        config.server_port,
        config.store_timeout_ms
    );

    let (store, sweeper) = match &config.store {
        StoreConfig::Memory => {
            let backend = MemoryBackend::new();
            let sweeper = spawn_cleanup_task(backend.clone(), config.cleanup_interval);
            let store =
                KvStore::with_backend(Arc::new(backend)).with_timeout(config.store_timeout());
            (store, Some(sweeper))
        }
        other => (KvStore::open(other, config.store_timeout()).await, None),
    };
    info!(status = ?store.status(), backend = store.backend_name(), "Cache store ready");

    let app = create_router(AppState::in_memory(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
        info!("Expiry sweeper stopped");
    }
}
