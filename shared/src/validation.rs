//! Validation utilities for planting and harvest data entry
//!
//! These checks belong to the form/API layer. The lifecycle derivation
//! itself never rejects data.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{MAX_QUALITY, MIN_QUALITY};

// ============================================================================
// Planting Validations
// ============================================================================

/// Validate the planted quantity is a positive count
pub fn validate_quantity(quantity: u32) -> Result<(), &'static str> {
    if quantity == 0 {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Validate a tray label is present and reasonably short
pub fn validate_tray_number(tray: &str) -> Result<(), &'static str> {
    let trimmed = tray.trim();
    if trimmed.is_empty() {
        return Err("Tray number is required");
    }
    if trimmed.chars().count() > 32 {
        return Err("Tray number must be at most 32 characters");
    }
    Ok(())
}

/// Validate the expected harvest is not before the sowing date
pub fn validate_planting_dates(
    date_planted: NaiveDate,
    expected_harvest: NaiveDate,
) -> Result<(), &'static str> {
    if expected_harvest < date_planted {
        return Err("Expected harvest cannot be before the planting date");
    }
    Ok(())
}

/// Validate dome and light stages fall inside the growth cycle, in order
pub fn validate_stage_dates(
    date_planted: NaiveDate,
    dome_date: Option<NaiveDate>,
    light_date: Option<NaiveDate>,
    expected_harvest: NaiveDate,
) -> Result<(), &'static str> {
    for stage in [dome_date, light_date].into_iter().flatten() {
        if stage < date_planted || stage > expected_harvest {
            return Err("Stage dates must fall between planting and expected harvest");
        }
    }
    if let (Some(dome), Some(light)) = (dome_date, light_date) {
        if light < dome {
            return Err("Light stage cannot start before the dome stage");
        }
    }
    Ok(())
}

// ============================================================================
// Harvest Validations
// ============================================================================

/// Validate quality score is 1-5
pub fn validate_quality(quality: u8) -> Result<(), &'static str> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err("Quality must be between 1 and 5");
    }
    Ok(())
}

/// Validate harvested weight is not negative
pub fn validate_harvest_weight(weight_grams: Decimal) -> Result<(), &'static str> {
    if weight_grams < Decimal::ZERO {
        return Err("Harvested weight cannot be negative");
    }
    Ok(())
}

/// Validate a harvest is not dated before its planting was sown
pub fn validate_harvest_date(
    date_planted: NaiveDate,
    harvest_date: NaiveDate,
) -> Result<(), &'static str> {
    if harvest_date < date_planted {
        return Err("Harvest date cannot be before the planting date");
    }
    Ok(())
}
