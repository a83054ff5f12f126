//! Harvest (cosecha) models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest quality score a harvest can receive
pub const MIN_QUALITY: u8 = 1;
/// Highest quality score a harvest can receive
pub const MAX_QUALITY: u8 = 5;

/// The recorded outcome when a planting is cut and weighed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Harvest {
    pub id: Uuid,
    /// Planting this harvest closes; at most one harvest per planting
    #[serde(alias = "siembra_id")]
    pub planting_id: Uuid,
    #[serde(alias = "fecha_cosecha")]
    pub harvest_date: NaiveDate,
    #[serde(alias = "peso_cosechado")]
    pub weight_grams: Decimal,
    /// Quality score 1-5
    #[serde(alias = "calidad")]
    pub quality: u8,
    #[serde(default, alias = "notas")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Harvest {
    /// Grams harvested per planted unit
    /// Returns None when nothing was planted
    pub fn yield_per_unit(&self, quantity: u32) -> Option<Decimal> {
        if quantity > 0 {
            Some(self.weight_grams / Decimal::from(quantity))
        } else {
            None
        }
    }
}
