//! Planting management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{PaginatedResponse, Pagination, PlantingStatus};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::harvest::{HarvestService, HarvestView};
use crate::services::planting::{
    CreatePlantingInput, PlantingFilter, PlantingService, PlantingView, UpdatePlantingInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlantingQuery {
    pub status: Option<String>,
    pub tray: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn planting_service(state: &AppState) -> PlantingService {
    PlantingService::new(
        state.plantings.clone(),
        state.harvests.clone(),
        state.catalog.clone(),
    )
}

/// List plantings, newest sowing first
pub async fn list_plantings(
    State(state): State<AppState>,
    Query(query): Query<PlantingQuery>,
) -> AppResult<Json<PaginatedResponse<PlantingView>>> {
    let status = match query.status.as_deref() {
        Some(s) => Some(PlantingStatus::from_str(s).ok_or_else(|| {
            AppError::invalid_field("status", "Unknown status; expected sembrado, creciendo, listo or cosechado")
        })?),
        None => None,
    };
    let filter = PlantingFilter {
        status,
        tray: query.tray,
    };

    let defaults = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let plantings = planting_service(&state).list(state.clock.today(), &filter)?;
    Ok(Json(pagination.paginate(plantings)))
}

/// Get a specific planting
pub async fn get_planting(
    State(state): State<AppState>,
    Path(planting_id): Path<Uuid>,
) -> AppResult<Json<PlantingView>> {
    let planting = planting_service(&state).get(planting_id, state.clock.today())?;
    Ok(Json(planting))
}

/// Record a new planting
pub async fn create_planting(
    State(state): State<AppState>,
    Json(input): Json<CreatePlantingInput>,
) -> AppResult<impl IntoResponse> {
    let planting = planting_service(&state).create(input, state.clock.today())?;
    Ok((StatusCode::CREATED, Json(planting)))
}

/// Update a planting
pub async fn update_planting(
    State(state): State<AppState>,
    Path(planting_id): Path<Uuid>,
    Json(input): Json<UpdatePlantingInput>,
) -> AppResult<Json<PlantingView>> {
    let planting = planting_service(&state).update(planting_id, input, state.clock.today())?;
    Ok(Json(planting))
}

/// Delete a planting and its harvest
pub async fn delete_planting(
    State(state): State<AppState>,
    Path(planting_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    planting_service(&state).delete(planting_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the harvest recorded for a planting
pub async fn get_planting_harvest(
    State(state): State<AppState>,
    Path(planting_id): Path<Uuid>,
) -> AppResult<Json<HarvestView>> {
    let service = HarvestService::new(state.harvests.clone(), state.plantings.clone());
    Ok(Json(service.for_planting(planting_id)?))
}
