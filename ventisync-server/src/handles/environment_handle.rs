use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use time::OffsetDateTime;
use ventisync_api::models::EnvironmentResponse;

use crate::errors::{ApiError, EnvironmentError};
use crate::services::{CacheLookup, CacheService, DecisionService};

#[derive(Clone)]
pub struct EnvironmentState {
    pub cache: Arc<CacheService>,
    pub decision: Arc<DecisionService>,
}

pub fn environment_router(environment_state: EnvironmentState) -> Router {
    Router::new()
        .route("/api/environment", get(get_environment))
        .route("/api/environment/all", get(list_environment))
        .with_state(environment_state)
}

#[utoipa::path(
    get,
    path = "/api/environment",
    tag = "environment",
    responses(
        (status = 200, description = "Latest reading for the default location", body = EnvironmentResponse),
        (status = 503, description = "No reading fetched yet")
    )
)]
pub async fn get_environment(
    State(state): State<EnvironmentState>,
) -> Result<Json<EnvironmentResponse>, ApiError> {
    let location = state.decision.location();
    let lookup = state.cache.get(location, OffsetDateTime::now_utc()).await;

    // The decision engine's fallback reading is never shown as real data.
    let response =
        to_response(&state.decision, &lookup).ok_or(EnvironmentError::Unavailable(location))?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/environment/all",
    tag = "environment",
    responses(
        (status = 200, description = "Latest reading for every refreshed location, sorted by location", body = [EnvironmentResponse])
    )
)]
pub async fn list_environment(
    State(state): State<EnvironmentState>,
) -> Json<Vec<EnvironmentResponse>> {
    let snapshot = state.cache.snapshot(OffsetDateTime::now_utc()).await;

    Json(
        snapshot
            .iter()
            .filter_map(|lookup| to_response(&state.decision, lookup))
            .collect(),
    )
}

fn to_response(decision: &DecisionService, lookup: &CacheLookup) -> Option<EnvironmentResponse> {
    let entry = lookup.entry()?;

    Some(EnvironmentResponse {
        location: entry.key.coordinates(),
        reading: entry.reading.clone(),
        fresh: lookup.is_fresh(),
        fetched_at: entry.fetched_at,
        recommendation: decision.decide(&entry.reading),
    })
}
