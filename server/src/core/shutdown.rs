//! Centralized shutdown management

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use super::constants::SHUTDOWN_TIMEOUT_SECS;
use crate::data::{SearchService, SqliteService};

/// Coordinates graceful shutdown of background tasks and stores
#[derive(Clone)]
pub struct ShutdownService {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
    database: Arc<SqliteService>,
    search: Arc<SearchService>,
}

impl ShutdownService {
    pub fn new(database: Arc<SqliteService>, search: Arc<SearchService>) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            handles: Arc::new(Mutex::new(Vec::new())),
            database,
            search,
        }
    }

    /// Register a background task handle to be awaited during shutdown
    pub async fn register(&self, handle: JoinHandle<()>) {
        self.handles.lock().await.push(handle);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Trigger shutdown and wait for all registered tasks to complete
    ///
    /// Shutdown order:
    /// 1. Signal all tasks to stop
    /// 2. Wait for background tasks (bounded by a timeout)
    /// 3. Checkpoint and close the primary store, close the search mirror
    pub async fn shutdown(&self) {
        tracing::debug!("Initiating graceful shutdown...");
        self.trigger();

        let handles = std::mem::take(&mut *self.handles.lock().await);
        tracing::debug!(
            count = handles.len(),
            "Waiting for background tasks to finish..."
        );

        let timeout = Duration::from_secs(SHUTDOWN_TIMEOUT_SECS);
        match tokio::time::timeout(timeout, futures::future::join_all(handles)).await {
            Ok(_) => tracing::debug!("All background tasks completed"),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "Timeout waiting for background tasks"
                );
            }
        }

        tracing::debug!("Closing database connections...");
        let database = self.database.clone();
        let search = self.search.clone();
        tokio::join!(
            async {
                if let Err(e) = database.checkpoint().await {
                    tracing::warn!("SQLite checkpoint failed: {}", e);
                }
                database.close().await;
            },
            search.close(),
        );

        tracing::debug!("Shutdown complete");
    }

    /// Owned future resolving once shutdown is triggered (for axum graceful shutdown)
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|&v| v).await;
        }
    }

    /// Install OS signal handlers and auto-trigger on Ctrl+C/SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut signal) => {
                        signal.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::debug!("Received Ctrl+C, shutting down"),
                _ = terminate => tracing::debug!("Received SIGTERM, shutting down"),
            }

            service.trigger();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_shutdown() -> ShutdownService {
        let database = Arc::new(SqliteService::in_memory().await.unwrap());
        ShutdownService::new(database, Arc::new(SearchService::disabled()))
    }

    #[tokio::test]
    async fn test_shutdown_not_triggered_initially() {
        let shutdown = make_shutdown().await;
        assert!(!shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_shutdown_wait_returns_after_trigger() {
        let shutdown = make_shutdown().await;
        let handle = tokio::spawn(shutdown.wait());

        tokio::task::yield_now().await;
        shutdown.trigger();

        tokio::time::timeout(Duration::from_millis(100), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_registered_tasks() {
        let shutdown = make_shutdown().await;
        let mut rx = shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let _ = rx.wait_for(|&v| v).await;
        });
        shutdown.register(handle).await;

        tokio::time::timeout(Duration::from_secs(5), shutdown.shutdown())
            .await
            .unwrap();
        assert!(shutdown.is_triggered());
        assert!(shutdown.handles.lock().await.is_empty());
    }
}
