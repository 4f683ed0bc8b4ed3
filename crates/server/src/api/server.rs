use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;

use super::{health, metrics};
use fanpage_likes::LikeCoordinator;

pub fn router(coordinator: LikeCoordinator) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .with_state(coordinator)
}

pub async fn serve(
    listener: TcpListener,
    coordinator: LikeCoordinator,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(coordinator);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
