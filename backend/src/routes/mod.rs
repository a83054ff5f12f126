//! Route definitions for the Microgreens Grow Tracker

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/plantings", planting_routes())
        .nest("/harvests", harvest_routes())
        .nest("/varieties", variety_routes())
        .route("/calendar", get(handlers::get_calendar))
        .route("/reports", post(handlers::generate_report))
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Planting management routes
fn planting_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plantings).post(handlers::create_planting))
        .route(
            "/:planting_id",
            get(handlers::get_planting)
                .put(handlers::update_planting)
                .delete(handlers::delete_planting),
        )
        .route("/:planting_id/harvest", get(handlers::get_planting_harvest))
}

/// Harvest management routes
fn harvest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_harvests).post(handlers::record_harvest))
        .route(
            "/:harvest_id",
            get(handlers::get_harvest)
                .put(handlers::update_harvest)
                .delete(handlers::delete_harvest),
        )
}

/// Variety catalog routes
fn variety_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_varieties))
        .route("/:name", get(handlers::get_variety))
        .route("/:name/schedule", get(handlers::get_variety_schedule))
}
