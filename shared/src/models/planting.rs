//! Planting (siembra) models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sown batch of microgreens tracked through its growth cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Planting {
    pub id: Uuid,
    /// Variety label, free text
    #[serde(alias = "tipo_microgreen")]
    pub plant_name: String,
    #[serde(alias = "fecha_siembra")]
    pub date_planted: NaiveDate,
    /// Start of the humidity dome stage
    #[serde(default)]
    pub dome_date: Option<NaiveDate>,
    /// Start of the light stage
    #[serde(default)]
    pub light_date: Option<NaiveDate>,
    #[serde(alias = "fecha_esperada_cosecha")]
    pub expected_harvest: NaiveDate,
    #[serde(default, alias = "fecha_real_cosecha")]
    pub actual_harvest_date: Option<NaiveDate>,
    #[serde(alias = "cantidad_sembrada")]
    pub quantity: u32,
    #[serde(alias = "ubicacion_bandeja")]
    pub tray_number: String,
    /// Derived from the dates; overwritten on every read
    #[serde(default, alias = "estado")]
    pub status: PlantingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a planting, ordered from sown to harvested
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PlantingStatus {
    /// Sown, not yet under dome or light
    #[default]
    Sembrado,
    /// Growing under dome or light
    Creciendo,
    /// Ready to harvest
    Listo,
    /// Harvested (terminal)
    Cosechado,
}

impl PlantingStatus {
    pub const ALL: [PlantingStatus; 4] = [
        PlantingStatus::Sembrado,
        PlantingStatus::Creciendo,
        PlantingStatus::Listo,
        PlantingStatus::Cosechado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantingStatus::Sembrado => "sembrado",
            PlantingStatus::Creciendo => "creciendo",
            PlantingStatus::Listo => "listo",
            PlantingStatus::Cosechado => "cosechado",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sembrado" => Some(PlantingStatus::Sembrado),
            "creciendo" => Some(PlantingStatus::Creciendo),
            "listo" => Some(PlantingStatus::Listo),
            "cosechado" => Some(PlantingStatus::Cosechado),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlantingStatus::Cosechado)
    }
}

impl std::fmt::Display for PlantingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlantingStatus::Sembrado => write!(f, "Sembrado"),
            PlantingStatus::Creciendo => write!(f, "Creciendo"),
            PlantingStatus::Listo => write!(f, "Listo"),
            PlantingStatus::Cosechado => write!(f, "Cosechado"),
        }
    }
}

/// Sub-stage of a growing planting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPhase {
    /// Under the humidity dome (cúpula), no light yet
    Dome,
    /// Uncovered under light
    Light,
}
