//! Planting management service
//!
//! Status is recomputed from the dates on every read; the stored `status`
//! field is refreshed before a planting leaves this service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    refresh_status, snapshot, validate_planting_dates, validate_quantity, validate_stage_dates,
    validate_tray_number, Harvest, LifecycleDates, LifecycleSnapshot, Planting, PlantingStatus,
    VarietyCatalog,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Planting service for managing sown batches
#[derive(Clone)]
pub struct PlantingService {
    plantings: Arc<dyn Repository<Planting>>,
    harvests: Arc<dyn Repository<Harvest>>,
    catalog: Arc<VarietyCatalog>,
}

/// A planting with its lifecycle derived for today
#[derive(Debug, Clone, Serialize)]
pub struct PlantingView {
    #[serde(flatten)]
    pub planting: Planting,
    pub lifecycle: LifecycleSnapshot,
}

impl PlantingView {
    pub fn derive(mut planting: Planting, today: NaiveDate) -> Self {
        refresh_status(&mut planting, today);
        let lifecycle = snapshot(&LifecycleDates::from(&planting), today);
        Self {
            planting,
            lifecycle,
        }
    }
}

/// Input for creating a planting
///
/// Missing expected harvest and stage dates are filled from the variety
/// catalog when the plant name matches a catalog entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlantingInput {
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "tipo_microgreen")]
    pub plant_name: String,
    #[serde(alias = "fecha_siembra")]
    pub date_planted: NaiveDate,
    pub dome_date: Option<NaiveDate>,
    pub light_date: Option<NaiveDate>,
    #[serde(alias = "fecha_esperada_cosecha")]
    pub expected_harvest: Option<NaiveDate>,
    #[validate(range(min = 1))]
    #[serde(alias = "cantidad_sembrada")]
    pub quantity: u32,
    #[validate(length(min = 1, max = 32))]
    #[serde(alias = "ubicacion_bandeja")]
    pub tray_number: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Input for updating a planting
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlantingInput {
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "tipo_microgreen")]
    pub plant_name: Option<String>,
    #[serde(alias = "fecha_siembra")]
    pub date_planted: Option<NaiveDate>,
    /// `null` clears the stage date
    #[serde(default, deserialize_with = "double_option")]
    pub dome_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub light_date: Option<Option<NaiveDate>>,
    #[serde(alias = "fecha_esperada_cosecha")]
    pub expected_harvest: Option<NaiveDate>,
    #[validate(range(min = 1))]
    #[serde(alias = "cantidad_sembrada")]
    pub quantity: Option<u32>,
    #[validate(length(min = 1, max = 32))]
    #[serde(alias = "ubicacion_bandeja")]
    pub tray_number: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Absent field is `None`, explicit `null` is `Some(None)`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// List filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantingFilter {
    pub status: Option<PlantingStatus>,
    pub tray: Option<String>,
}

/// Check the cross-field rules the form layer relies on
fn validate_planting(planting: &Planting) -> AppResult<()> {
    if planting.plant_name.is_empty() {
        return Err(AppError::invalid_field("plant_name", "Plant name is required"));
    }
    validate_quantity(planting.quantity).map_err(|msg| AppError::invalid_field("quantity", msg))?;
    validate_tray_number(&planting.tray_number)
        .map_err(|msg| AppError::invalid_field("tray_number", msg))?;
    validate_planting_dates(planting.date_planted, planting.expected_harvest)
        .map_err(|msg| AppError::invalid_field("expected_harvest", msg))?;
    validate_stage_dates(
        planting.date_planted,
        planting.dome_date,
        planting.light_date,
        planting.expected_harvest,
    )
    .map_err(|msg| AppError::invalid_field("dome_date", msg))?;
    Ok(())
}

impl PlantingService {
    /// Create a new PlantingService instance
    pub fn new(
        plantings: Arc<dyn Repository<Planting>>,
        harvests: Arc<dyn Repository<Harvest>>,
        catalog: Arc<VarietyCatalog>,
    ) -> Self {
        Self {
            plantings,
            harvests,
            catalog,
        }
    }

    /// All plantings, newest sowing first
    pub fn list(&self, today: NaiveDate, filter: &PlantingFilter) -> AppResult<Vec<PlantingView>> {
        let mut views: Vec<PlantingView> = self
            .plantings
            .list()?
            .into_iter()
            .map(|p| PlantingView::derive(p, today))
            .filter(|v| filter.status.map_or(true, |s| v.planting.status == s))
            .filter(|v| {
                filter
                    .tray
                    .as_deref()
                    .map_or(true, |t| v.planting.tray_number == t)
            })
            .collect();
        views.sort_by(|a, b| b.planting.date_planted.cmp(&a.planting.date_planted));
        Ok(views)
    }

    /// Get a planting by ID
    pub fn get(&self, id: Uuid, today: NaiveDate) -> AppResult<PlantingView> {
        let planting = self
            .plantings
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Planting".to_string()))?;
        Ok(PlantingView::derive(planting, today))
    }

    /// Record a new planting
    pub fn create(&self, input: CreatePlantingInput, today: NaiveDate) -> AppResult<PlantingView> {
        input.validate()?;

        let plan = self
            .catalog
            .find(&input.plant_name)
            .map(|variety| variety.stage_plan(input.date_planted));

        let expected_harvest = input
            .expected_harvest
            .or(plan.map(|p| p.expected_harvest))
            .ok_or_else(|| {
                AppError::invalid_field(
                    "expected_harvest",
                    "Expected harvest is required for varieties outside the catalog",
                )
            })?;

        // Catalog stage dates only apply when they fit the chosen harvest date
        let dome_date = input
            .dome_date
            .or(plan.and_then(|p| p.dome_date).filter(|d| *d <= expected_harvest));
        let light_date = input
            .light_date
            .or(plan.and_then(|p| p.light_date).filter(|d| *d <= expected_harvest));

        let now = Utc::now();
        let mut planting = Planting {
            id: Uuid::new_v4(),
            plant_name: input.plant_name.trim().to_string(),
            date_planted: input.date_planted,
            dome_date,
            light_date,
            expected_harvest,
            actual_harvest_date: None,
            quantity: input.quantity,
            tray_number: input.tray_number.trim().to_string(),
            status: PlantingStatus::Sembrado,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        validate_planting(&planting)?;
        refresh_status(&mut planting, today);

        let created = self.plantings.create(planting)?;
        tracing::info!(
            planting_id = %created.id,
            plant_name = %created.plant_name,
            tray = %created.tray_number,
            "Planting recorded"
        );
        Ok(PlantingView::derive(created, today))
    }

    /// Update a planting
    ///
    /// The harvest date is owned by the harvest record and cannot be set here.
    pub fn update(
        &self,
        id: Uuid,
        input: UpdatePlantingInput,
        today: NaiveDate,
    ) -> AppResult<PlantingView> {
        input.validate()?;

        let existing = self
            .plantings
            .get(id)?
            .ok_or_else(|| AppError::NotFound("Planting".to_string()))?;
        let previous_status = shared::derive_status(&LifecycleDates::from(&existing), today);

        let mut planting = existing.clone();
        if let Some(name) = input.plant_name {
            planting.plant_name = name.trim().to_string();
        }
        planting.date_planted = input.date_planted.unwrap_or(existing.date_planted);
        if let Some(dome_date) = input.dome_date {
            planting.dome_date = dome_date;
        }
        if let Some(light_date) = input.light_date {
            planting.light_date = light_date;
        }
        planting.expected_harvest = input.expected_harvest.unwrap_or(existing.expected_harvest);
        planting.quantity = input.quantity.unwrap_or(existing.quantity);
        if let Some(tray) = input.tray_number {
            planting.tray_number = tray.trim().to_string();
        }
        if let Some(notes) = input.notes {
            planting.notes = notes;
        }

        validate_planting(&planting)?;
        let status = refresh_status(&mut planting, today);
        if status < previous_status {
            tracing::info!(
                planting_id = %id,
                from = previous_status.as_str(),
                to = status.as_str(),
                "Planting status moved back after date edit"
            );
        }

        let updated = self.plantings.update(planting)?;
        Ok(PlantingView::derive(updated, today))
    }

    /// Delete a planting and its harvest
    pub fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.plantings.delete(id)? {
            return Err(AppError::NotFound("Planting".to_string()));
        }

        for harvest in self.harvests.list()?.into_iter().filter(|h| h.planting_id == id) {
            self.harvests.delete(harvest.id)?;
            tracing::debug!(harvest_id = %harvest.id, "Removed harvest of deleted planting");
        }

        tracing::info!(planting_id = %id, "Planting deleted");
        Ok(())
    }
}
