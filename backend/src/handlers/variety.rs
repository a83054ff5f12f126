//! Variety catalog handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{parse_date_string, PlantVariety, StagePlan, VarietyCategory};

use crate::error::{AppError, AppResult};
use crate::services::VarietyService;
use crate::AppState;

#[derive(Deserialize)]
pub struct VarietyQuery {
    pub category: Option<VarietyCategory>,
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    pub planted: Option<String>,
}

/// List catalog varieties
pub async fn list_varieties(
    State(state): State<AppState>,
    Query(query): Query<VarietyQuery>,
) -> Json<Vec<PlantVariety>> {
    Json(VarietyService::new(state.catalog.clone()).list(query.category))
}

/// Get a variety by name
pub async fn get_variety(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<PlantVariety>> {
    Ok(Json(VarietyService::new(state.catalog.clone()).get(&name)?))
}

/// Default stage dates for a sowing; `planted` defaults to today
pub async fn get_variety_schedule(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<StagePlan>> {
    let planted = match query.planted.as_deref() {
        Some(s) => parse_date_string(s).map_err(AppError::from)?,
        None => state.clock.today(),
    };
    Ok(Json(VarietyService::new(state.catalog.clone()).schedule(&name, planted)?))
}
