//! Ctrl+C handling shared by the plain and TLS listeners.

use std::{future::Future, time::Duration};

use axum_server::Handle;

/// How long in-flight connections get to finish once shutdown starts.
pub const GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Start a graceful shutdown of the server behind `handle` once `signal` resolves.
pub fn drain_on<F>(signal: F, handle: Handle)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        signal.await;
        handle.graceful_shutdown(Some(GRACE_PERIOD));
    });
}
