//! Reporting service for grow reports and data export
//! Provides filtered planting reports, CSV export and dashboard metrics

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::{
    build_report, derive_status, Harvest, LifecycleDates, Planting, PlantingStatus, Report,
    ReportConfig,
};

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    plantings: Arc<dyn Repository<Planting>>,
    harvests: Arc<dyn Repository<Harvest>>,
}

/// Export format of a report
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

/// Report request body
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ReportRequest {
    pub config: ReportConfig,
    pub format: ReportFormat,
}

/// JSON report payload
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub generated_for: NaiveDate,
    pub columns: Vec<&'static str>,
    pub labels: Vec<&'static str>,
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    pub summary: shared::ReportSummary,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            generated_for: report.generated_for,
            columns: report.headers(),
            labels: report.columns.iter().map(|c| c.label()).collect(),
            rows: report.json_rows(),
            summary: report.summary,
        }
    }
}

/// A planting due for harvest soon
#[derive(Debug, Serialize)]
pub struct UpcomingHarvest {
    pub planting_id: uuid::Uuid,
    pub plant_name: String,
    pub tray_number: String,
    pub expected_harvest: NaiveDate,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub today: NaiveDate,
    pub total_plantings: usize,
    pub by_status: BTreeMap<PlantingStatus, usize>,
    /// Plantings whose expected harvest is today
    pub ready_today: usize,
    /// Unharvested plantings past their expected harvest
    pub overdue: usize,
    /// Expected harvests in the next 7 days
    pub upcoming_harvests: Vec<UpcomingHarvest>,
    pub total_harvested_grams: Decimal,
    pub avg_quality: Option<Decimal>,
}

/// Days ahead covered by the upcoming harvest list
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

impl ReportingService {
    pub fn new(
        plantings: Arc<dyn Repository<Planting>>,
        harvests: Arc<dyn Repository<Harvest>>,
    ) -> Self {
        Self {
            plantings,
            harvests,
        }
    }

    /// Filter, sort and project all plantings
    pub fn build(&self, config: &ReportConfig, today: NaiveDate) -> AppResult<Report> {
        if let Some(range) = config.date_range {
            if range.end < range.start {
                return Err(AppError::invalid_field(
                    "date_range",
                    "End date cannot be before start date",
                ));
            }
        }
        if let (Some(min), Some(max)) = (config.quantity.min, config.quantity.max) {
            if max < min {
                return Err(AppError::invalid_field(
                    "quantity",
                    "Maximum quantity cannot be below the minimum",
                ));
            }
        }

        let plantings = self.plantings.list()?;
        let report = build_report(&plantings, config, today);
        tracing::debug!(rows = report.rows.len(), "Report built");
        Ok(report)
    }

    /// Get dashboard metrics
    pub fn get_dashboard_metrics(&self, today: NaiveDate) -> AppResult<DashboardMetrics> {
        let plantings = self.plantings.list()?;
        let harvests = self.harvests.list()?;
        let horizon = today
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);

        let mut by_status = BTreeMap::new();
        let mut ready_today = 0;
        let mut overdue = 0;
        let mut upcoming_harvests = Vec::new();

        for planting in &plantings {
            let status = derive_status(&LifecycleDates::from(planting), today);
            *by_status.entry(status).or_insert(0) += 1;

            if status == PlantingStatus::Cosechado {
                continue;
            }
            if planting.expected_harvest == today {
                ready_today += 1;
            } else if planting.expected_harvest < today {
                overdue += 1;
            } else if planting.expected_harvest <= horizon {
                upcoming_harvests.push(UpcomingHarvest {
                    planting_id: planting.id,
                    plant_name: planting.plant_name.clone(),
                    tray_number: planting.tray_number.clone(),
                    expected_harvest: planting.expected_harvest,
                });
            }
        }
        upcoming_harvests.sort_by_key(|u| u.expected_harvest);

        let total_harvested_grams: Decimal = harvests.iter().map(|h| h.weight_grams).sum();
        let avg_quality = if harvests.is_empty() {
            None
        } else {
            let total: Decimal = harvests.iter().map(|h| Decimal::from(h.quality)).sum();
            Some(
                (total / Decimal::from(harvests.len()))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            )
        };

        Ok(DashboardMetrics {
            today,
            total_plantings: plantings.len(),
            by_status,
            ready_today,
            overdue,
            upcoming_harvests,
            total_harvested_grams,
            avg_quality,
        })
    }

    /// Export a report as CSV with a header row of column keys
    pub fn export_to_csv(report: &Report) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(report.headers()).map_err(|e| {
            AppError::Internal(format!("CSV serialization error: {}", e))
        })?;
        for row in &report.rows {
            wtr.write_record(row.cells.iter().map(|cell| cell.to_string()))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
