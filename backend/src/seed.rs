//! Demo fixtures
//!
//! Six plantings spread around `today` so every status shows up, plus one
//! recorded harvest.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::services::harvest::{HarvestService, RecordHarvestInput};
use crate::services::planting::{CreatePlantingInput, PlantingService};
use crate::AppState;

/// (variety, days before today it was sown, tray, quantity)
const DEMO_PLANTINGS: [(&str, u64, &str, u32); 6] = [
    ("Rábano", 0, "A-1", 60),
    ("Girasol", 4, "A-2", 40),
    ("Guisante", 10, "B-1", 45),
    ("Brócoli", 12, "B-2", 80),
    ("Mostaza", 14, "C-1", 70),
    ("Albahaca", 3, "C-2", 50),
];

fn days_ago(today: NaiveDate, days: u64) -> AppResult<NaiveDate> {
    today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| AppError::Internal("Demo date out of range".to_string()))
}

/// Load the demo plantings and harvest into empty stores
pub fn load_demo_data(state: &AppState, today: NaiveDate) -> AppResult<()> {
    let plantings = PlantingService::new(
        state.plantings.clone(),
        state.harvests.clone(),
        state.catalog.clone(),
    );
    let harvests = HarvestService::new(state.harvests.clone(), state.plantings.clone());

    let mut created = Vec::with_capacity(DEMO_PLANTINGS.len());
    for (name, sown_days_ago, tray, quantity) in DEMO_PLANTINGS {
        let view = plantings.create(
            CreatePlantingInput {
                plant_name: name.to_string(),
                date_planted: days_ago(today, sown_days_ago)?,
                dome_date: None,
                light_date: None,
                expected_harvest: None,
                quantity,
                tray_number: tray.to_string(),
                notes: None,
            },
            today,
        )?;
        created.push(view.planting);
    }

    // Mustard was sown longest ago and has already been cut
    if let Some(mustard) = created.iter().find(|p| p.plant_name == "Mostaza") {
        harvests.record(RecordHarvestInput {
            planting_id: mustard.id,
            harvest_date: mustard.expected_harvest.min(today),
            weight_grams: Decimal::new(3125, 1),
            quality: 4,
            notes: Some("Demo harvest".to_string()),
        })?;
    }

    tracing::debug!(plantings = created.len(), "Demo data seeded");
    Ok(())
}
