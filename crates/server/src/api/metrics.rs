use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use fanpage_likes::metrics::exposition::{render_prometheus, write_gauge};
use fanpage_likes::LikeCoordinator;

pub async fn metrics(State(coordinator): State<LikeCoordinator>) -> impl IntoResponse {
    let mut body = render_prometheus(coordinator.metrics());
    write_gauge(
        &mut body,
        "fanpage_likes_ledger_actors",
        coordinator.ledger().tracked_actors() as u64,
    );
    write_gauge(
        &mut body,
        "fanpage_likes_ledger_records",
        coordinator.ledger().record_count() as u64,
    );
    write_gauge(
        &mut body,
        "fanpage_likes_rate_limiter_actors",
        coordinator.limiter().tracked_actors() as u64,
    );
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
