use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use time::OffsetDateTime;
use ventisync_api::models::{TelemetryRequest, TelemetryResponse};

use crate::services::SessionService;

#[derive(Clone)]
pub struct DeviceState {
    pub session: Arc<SessionService>,
}

pub fn device_router(device_state: DeviceState) -> Router {
    Router::new()
        .route("/api/device/telemetry", post(report_telemetry))
        .with_state(device_state)
}

#[utoipa::path(
    post,
    path = "/api/device/telemetry",
    tag = "device",
    request_body = TelemetryRequest,
    responses(
        (status = 200, description = "Report accepted, next command returned", body = TelemetryResponse),
        (status = 422, description = "Malformed report")
    )
)]
pub async fn report_telemetry(
    State(state): State<DeviceState>,
    Json(body): Json<TelemetryRequest>,
) -> Json<TelemetryResponse> {
    let response = state
        .session
        .handle_telemetry(&body, OffsetDateTime::now_utc())
        .await;

    Json(response)
}
