use std::sync::Arc;

use fanpage_likes::{InMemoryCounterStore, LikeCoordinator};
use fanpage_server::api;
use fanpage_server::config::ServerConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        window_s = config.likes.window_seconds,
        rate_cap = config.likes.rate_cap,
        admission = ?config.likes.admission,
        duplicate_likes = ?config.likes.duplicate_likes,
        "likes core configured"
    );

    // The document-store adapter lives outside this process; the in-memory
    // counter stands in for it here.
    let store = Arc::new(InMemoryCounterStore::new());
    let coordinator = LikeCoordinator::new(config.likes.clone(), store)?;

    let shutdown = CancellationToken::new();
    let sweeper = coordinator.sweeper().spawn(shutdown.clone());

    let api_addr = config.api_addr;
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    tracing::info!(%api_addr, "ops API server starting");
    let api_shutdown = shutdown.clone();
    let api_handle = tokio::spawn(api::serve(listener, coordinator.clone(), async move {
        api_shutdown.cancelled().await
    }));

    fanpage_server::shutdown::wait_for_shutdown().await;
    tracing::info!("shutting down");
    shutdown.cancel();

    sweeper.shutdown().await;
    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("API: {e}"),
        Err(e) => tracing::error!("API join: {e}"),
    }

    let metrics = coordinator.metrics();
    tracing::info!(
        likes = metrics.likes_admitted_val(),
        unlikes = metrics.unlikes_val(),
        store_failures = metrics.store_failures_val(),
        "stopped"
    );
    Ok(())
}
