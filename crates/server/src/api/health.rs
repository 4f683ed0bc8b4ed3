use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use fanpage_likes::LikeCoordinator;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ledger_actors: usize,
    pub ledger_records: usize,
    pub rate_limited_actors: usize,
}

pub async fn healthz(State(coordinator): State<LikeCoordinator>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ledger_actors: coordinator.ledger().tracked_actors(),
        ledger_records: coordinator.ledger().record_count(),
        rate_limited_actors: coordinator.limiter().tracked_actors(),
    })
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}
