//! Grow calendar service

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{calendar_days, refresh_status, CalendarDay, DateRange, Planting};

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Longest range a single calendar request may cover
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Clone)]
pub struct CalendarService {
    plantings: Arc<dyn Repository<Planting>>,
}

impl CalendarService {
    pub fn new(plantings: Arc<dyn Repository<Planting>>) -> Self {
        Self { plantings }
    }

    /// Milestones between `start` and `end` inclusive, grouped by day
    pub fn days(&self, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> AppResult<Vec<CalendarDay>> {
        if end < start {
            return Err(AppError::invalid_field("end", "End date cannot be before start date"));
        }
        if (end - start).num_days() > MAX_RANGE_DAYS {
            return Err(AppError::invalid_field("end", "Calendar range cannot exceed one year"));
        }

        let mut plantings = self.plantings.list()?;
        for planting in plantings.iter_mut() {
            refresh_status(planting, today);
        }
        Ok(calendar_days(&plantings, &DateRange::new(start, end), today))
    }
}
