// utils.rs
use crate::error::CloudError;
use std::{future::Future, time::Duration};
use tracing::info;

/// Bounds a remote call, reporting expiry as [`CloudError::Timeout`].
pub async fn with_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, CloudError>
where
    F: Future<Output = Result<T, CloudError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CloudError::Timeout {
            operation,
            secs: limit.as_secs(),
        }),
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
