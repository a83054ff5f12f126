//! Harvest management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::harvest::{HarvestService, HarvestView, RecordHarvestInput, UpdateHarvestInput};
use crate::AppState;

fn harvest_service(state: &AppState) -> HarvestService {
    HarvestService::new(state.harvests.clone(), state.plantings.clone())
}

/// List all harvests
pub async fn list_harvests(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let harvests = harvest_service(&state).list()?;
    Ok(Json(serde_json::json!({ "harvests": harvests })))
}

/// Get a specific harvest
pub async fn get_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<Json<HarvestView>> {
    Ok(Json(harvest_service(&state).get(harvest_id)?))
}

/// Record a new harvest
pub async fn record_harvest(
    State(state): State<AppState>,
    Json(input): Json<RecordHarvestInput>,
) -> AppResult<impl IntoResponse> {
    let harvest = harvest_service(&state).record(input)?;
    Ok((StatusCode::CREATED, Json(harvest)))
}

/// Update a harvest
pub async fn update_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
    Json(input): Json<UpdateHarvestInput>,
) -> AppResult<Json<HarvestView>> {
    Ok(Json(harvest_service(&state).update(harvest_id, input)?))
}

/// Delete a harvest
pub async fn delete_harvest(
    State(state): State<AppState>,
    Path(harvest_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    harvest_service(&state).delete(harvest_id)?;
    Ok(StatusCode::NO_CONTENT)
}
