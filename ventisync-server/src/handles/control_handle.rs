use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use time::{Duration, OffsetDateTime};
use ventisync_api::models::{ControlRequest, StatusResponse};

use crate::errors::ApiError;
use crate::services::ArbiterService;

#[derive(Clone)]
pub struct ControlState {
    pub arbiter: Arc<ArbiterService>,
    pub liveness_timeout: Duration,
}

pub fn control_router(control_state: ControlState) -> Router {
    Router::new()
        .route("/api/control", post(apply_control))
        .with_state(control_state)
}

#[utoipa::path(
    post,
    path = "/api/control",
    tag = "control",
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Control applied", body = StatusResponse),
        (status = 400, description = "Neither action nor autoMode given"),
        (status = 422, description = "Malformed request")
    )
)]
pub async fn apply_control(
    State(state): State<ControlState>,
    Json(body): Json<ControlRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let snapshot = state.arbiter.apply_control(&body, now).await?;

    Ok(Json(snapshot.to_status(now, state.liveness_timeout)))
}
