//! Health check handlers

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub farm: String,
    /// Current date in the farm's timezone
    pub today: NaiveDate,
    pub storage: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check the planting store answers
    let storage_status = match state.plantings.list() {
        Ok(_) => "available".to_string(),
        Err(_) => "unavailable".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        farm: state.config.farm.name.clone(),
        today: state.clock.today(),
        storage: storage_status,
    })
}
