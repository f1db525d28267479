use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;
use ventisync_api::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::device_handle::report_telemetry,
        super::control_handle::apply_control,
        super::status_handle::get_status,
        super::environment_handle::get_environment,
        super::environment_handle::list_environment,
    ),
    components(schemas(
        TelemetryRequest,
        TelemetryResponse,
        DeviceReading,
        ControlRequest,
        ControlAction,
        StatusResponse,
        Mode,
        EnvironmentResponse,
        NormalizedReading,
        Coordinates,
    )),
    tags(
        (name = "device", description = "Window device report-and-fetch"),
        (name = "control", description = "Manual overrides"),
        (name = "status", description = "Read-only coordinator state"),
        (name = "environment", description = "Cached weather and air quality")
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route("/api/openapi.json", get(get_openapi))
}

pub async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
