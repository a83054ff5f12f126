//! Harvest recording service
//!
//! A harvest owns its planting's `actual_harvest_date`: recording one sets
//! the date, editing it moves the date, deleting it clears the date.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    validate_harvest_date, validate_harvest_weight, validate_quality, Harvest, Planting,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Harvest service for recording cut trays
#[derive(Clone)]
pub struct HarvestService {
    harvests: Arc<dyn Repository<Harvest>>,
    plantings: Arc<dyn Repository<Planting>>,
}

/// Input for recording a harvest
#[derive(Debug, Deserialize, Validate)]
pub struct RecordHarvestInput {
    #[serde(alias = "siembra_id")]
    pub planting_id: Uuid,
    #[serde(alias = "fecha_cosecha")]
    pub harvest_date: NaiveDate,
    #[serde(alias = "peso_cosechado")]
    pub weight_grams: Decimal,
    #[validate(range(min = 1, max = 5))]
    #[serde(alias = "calidad")]
    pub quality: u8,
    #[validate(length(max = 2000))]
    #[serde(alias = "notas")]
    pub notes: Option<String>,
}

/// Input for updating a harvest
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHarvestInput {
    #[serde(alias = "fecha_cosecha")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(alias = "peso_cosechado")]
    pub weight_grams: Option<Decimal>,
    #[validate(range(min = 1, max = 5))]
    #[serde(alias = "calidad")]
    pub quality: Option<u8>,
    #[validate(length(max = 2000))]
    #[serde(alias = "notas")]
    pub notes: Option<String>,
}

/// A harvest with its yield relative to the planted quantity
#[derive(Debug, Clone, Serialize)]
pub struct HarvestView {
    #[serde(flatten)]
    pub harvest: Harvest,
    pub plant_name: String,
    pub tray_number: String,
    pub grams_per_unit: Option<Decimal>,
}

impl HarvestView {
    fn new(harvest: Harvest, planting: Option<&Planting>) -> Self {
        let grams_per_unit = planting.and_then(|p| harvest.yield_per_unit(p.quantity));
        Self {
            plant_name: planting.map(|p| p.plant_name.clone()).unwrap_or_default(),
            tray_number: planting.map(|p| p.tray_number.clone()).unwrap_or_default(),
            grams_per_unit,
            harvest,
        }
    }
}

fn already_harvested() -> AppError {
    AppError::Conflict {
        resource: "planting_id".to_string(),
        message: "This planting has already been harvested".to_string(),
        message_es: "Esta siembra ya fue cosechada".to_string(),
    }
}

fn validate_harvest(harvest: &Harvest, planting: &Planting) -> AppResult<()> {
    validate_quality(harvest.quality).map_err(|msg| AppError::invalid_field("quality", msg))?;
    validate_harvest_weight(harvest.weight_grams)
        .map_err(|msg| AppError::invalid_field("weight_grams", msg))?;
    validate_harvest_date(planting.date_planted, harvest.harvest_date)
        .map_err(|msg| AppError::invalid_field("harvest_date", msg))?;
    Ok(())
}

impl HarvestService {
    /// Create a new HarvestService instance
    pub fn new(
        harvests: Arc<dyn Repository<Harvest>>,
        plantings: Arc<dyn Repository<Planting>>,
    ) -> Self {
        Self {
            harvests,
            plantings,
        }
    }

    fn planting(&self, id: Uuid) -> AppResult<Planting> {
        self.plantings
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Planting".to_string()))
    }

    fn set_harvest_date(&self, mut planting: Planting, date: Option<NaiveDate>) -> AppResult<()> {
        planting.actual_harvest_date = date;
        self.plantings.update(planting)?;
        Ok(())
    }

    /// All harvests, most recent first
    pub fn list(&self) -> AppResult<Vec<HarvestView>> {
        let plantings = self.plantings.list()?;
        let mut views: Vec<HarvestView> = self
            .harvests
            .list()?
            .into_iter()
            .map(|h| {
                let planting = plantings.iter().find(|p| p.id == h.planting_id);
                HarvestView::new(h, planting)
            })
            .collect();
        views.sort_by(|a, b| b.harvest.harvest_date.cmp(&a.harvest.harvest_date));
        Ok(views)
    }

    /// Get a harvest by ID
    pub fn get(&self, id: Uuid) -> AppResult<HarvestView> {
        let harvest = self
            .harvests
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Harvest".to_string()))?;
        let planting = self.plantings.get(harvest.planting_id)?;
        Ok(HarvestView::new(harvest, planting.as_ref()))
    }

    /// The harvest recorded for a planting
    pub fn for_planting(&self, planting_id: Uuid) -> AppResult<HarvestView> {
        let planting = self.planting(planting_id)?;
        let harvest = self
            .harvests
            .list()?
            .into_iter()
            .find(|h| h.planting_id == planting_id)
            .ok_or_else(|| AppError::NotFound("Harvest".to_string()))?;
        Ok(HarvestView::new(harvest, Some(&planting)))
    }

    /// Record the harvest of a planting
    pub fn record(&self, input: RecordHarvestInput) -> AppResult<HarvestView> {
        input.validate()?;

        let planting = self.planting(input.planting_id)?;
        if planting.actual_harvest_date.is_some() {
            return Err(already_harvested());
        }

        let now = Utc::now();
        let harvest = Harvest {
            id: Uuid::new_v4(),
            planting_id: planting.id,
            harvest_date: input.harvest_date,
            weight_grams: input.weight_grams,
            quality: input.quality,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        validate_harvest(&harvest, &planting)?;

        let planting_id = planting.id;
        let created = self
            .harvests
            .create_unless(harvest, &|h: &Harvest| h.planting_id == planting_id)?
            .ok_or_else(already_harvested)?;
        self.set_harvest_date(planting.clone(), Some(created.harvest_date))?;

        tracing::info!(
            harvest_id = %created.id,
            planting_id = %planting.id,
            weight_grams = %created.weight_grams,
            "Harvest recorded"
        );
        Ok(HarvestView::new(created, Some(&planting)))
    }

    /// Update a harvest, moving the planting's harvest date along with it
    pub fn update(&self, id: Uuid, input: UpdateHarvestInput) -> AppResult<HarvestView> {
        input.validate()?;

        let mut harvest = self
            .harvests
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Harvest".to_string()))?;
        let planting = self.planting(harvest.planting_id)?;

        if let Some(date) = input.harvest_date {
            harvest.harvest_date = date;
        }
        if let Some(weight) = input.weight_grams {
            harvest.weight_grams = weight;
        }
        if let Some(quality) = input.quality {
            harvest.quality = quality;
        }
        if input.notes.is_some() {
            harvest.notes = input.notes;
        }
        validate_harvest(&harvest, &planting)?;

        let updated = self.harvests.update(harvest)?;
        if planting.actual_harvest_date != Some(updated.harvest_date) {
            self.set_harvest_date(planting.clone(), Some(updated.harvest_date))?;
        }

        tracing::debug!(harvest_id = %id, "Harvest updated");
        Ok(HarvestView::new(updated, Some(&planting)))
    }

    /// Delete a harvest; its planting returns to the date-derived status
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        let harvest = self
            .harvests
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Harvest".to_string()))?;

        self.harvests.delete(id)?;
        if let Some(planting) = self.plantings.get(harvest.planting_id)? {
            self.set_harvest_date(planting, None)?;
        }

        tracing::info!(harvest_id = %id, planting_id = %harvest.planting_id, "Harvest deleted");
        Ok(())
    }
}
