use tracing::info;

/// Resolves when the process receives Ctrl+C or SIGTERM
///
/// # Panics
///
/// Panics if the signal handlers cannot be installed
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl+C), initiating shutdown..."),
        () = terminate => info!("Received SIGTERM, initiating shutdown..."),
    }
}
