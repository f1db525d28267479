use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use time::{Duration, OffsetDateTime};
use ventisync_api::models::StatusResponse;

use crate::handles::status_events;
use crate::services::ArbiterService;

#[derive(Clone)]
pub struct StatusState {
    pub arbiter: Arc<ArbiterService>,
    pub liveness_timeout: Duration,
}

pub fn status_router(status_state: StatusState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/status/events", get(status_events))
        .with_state(status_state)
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Current coordinator state", body = StatusResponse)
    )
)]
pub async fn get_status(State(state): State<StatusState>) -> Json<StatusResponse> {
    let snapshot = state.arbiter.snapshot();

    Json(snapshot.to_status(OffsetDateTime::now_utc(), state.liveness_timeout))
}
