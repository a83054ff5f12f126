//! Planting calendar
//!
//! Turns plantings into dated events (sown, dome, light, harvest) that the
//! calendar view colours by kind and by the planting's current status.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::{derive_status, LifecycleDates};
use crate::models::{Planting, PlantingStatus};
use crate::types::DateRange;

/// Which lifecycle milestone an event marks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventKind {
    Planted,
    Dome,
    Light,
    /// Actual harvest if recorded, otherwise the expected one
    Harvest,
}

impl CalendarEventKind {
    /// Display colour of the event chip
    pub fn color(&self) -> &'static str {
        match self {
            CalendarEventKind::Planted => "#8b5a2b",
            CalendarEventKind::Dome => "#6b7280",
            CalendarEventKind::Light => "#eab308",
            CalendarEventKind::Harvest => "#16a34a",
        }
    }
}

/// A dated milestone of one planting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub kind: CalendarEventKind,
    pub planting_id: Uuid,
    pub plant_name: String,
    pub tray_number: String,
    pub status: PlantingStatus,
    /// Harvest events only: false while the date is still an estimate
    pub confirmed: bool,
    pub color: String,
}

/// Events on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// Every milestone of `planting`, whether or not it falls in a range
pub fn planting_events(planting: &Planting, today: NaiveDate) -> Vec<CalendarEvent> {
    let dates = LifecycleDates::from(planting);
    let status = derive_status(&dates, today);

    let harvest = match planting.actual_harvest_date {
        Some(actual) => (actual, true),
        None => (planting.expected_harvest, false),
    };

    let milestones = [
        Some((CalendarEventKind::Planted, planting.date_planted, true)),
        planting.dome_date.map(|d| (CalendarEventKind::Dome, d, true)),
        planting.light_date.map(|d| (CalendarEventKind::Light, d, true)),
        Some((CalendarEventKind::Harvest, harvest.0, harvest.1)),
    ];

    milestones
        .into_iter()
        .flatten()
        .map(|(kind, date, confirmed)| CalendarEvent {
            date,
            kind,
            planting_id: planting.id,
            plant_name: planting.plant_name.clone(),
            tray_number: planting.tray_number.clone(),
            status,
            confirmed,
            color: kind.color().to_string(),
        })
        .collect()
}

/// Events inside `range`, ordered by date then milestone kind
///
/// Ties keep the input order of the plantings.
pub fn calendar_events(
    plantings: &[Planting],
    range: &DateRange,
    today: NaiveDate,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = plantings
        .iter()
        .flat_map(|p| planting_events(p, today))
        .filter(|event| range.contains(event.date))
        .collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.kind.cmp(&b.kind)));
    events
}

/// Events inside `range` bucketed by day; days without events are omitted
pub fn calendar_days(plantings: &[Planting], range: &DateRange, today: NaiveDate) -> Vec<CalendarDay> {
    let mut by_day: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for event in calendar_events(plantings, range, today) {
        by_day.entry(event.date).or_default().push(event);
    }
    by_day
        .into_iter()
        .map(|(date, events)| CalendarDay { date, events })
        .collect()
}
