//! Grow calendar handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Days};
use serde::Deserialize;
use shared::{parse_date_string, CalendarDay};

use crate::error::{AppError, AppResult};
use crate::services::CalendarService;
use crate::AppState;

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Calendar events grouped by day
///
/// Without `start` the range opens on the first of the current month; without
/// `end` it spans 31 days.
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<Vec<CalendarDay>>> {
    let today = state.clock.today();

    let start = match query.start.as_deref() {
        Some(s) => parse_date_string(s)?,
        None => today.with_day(1).unwrap_or(today),
    };
    let end = match query.end.as_deref() {
        Some(s) => parse_date_string(s)?,
        None => start
            .checked_add_days(Days::new(30))
            .ok_or_else(|| AppError::invalid_field("start", "Start date is out of range"))?,
    };

    let days = CalendarService::new(state.plantings.clone()).days(start, end, today)?;
    Ok(Json(days))
}
