//! WebAssembly module for the Microgreens Grow Tracker
//!
//! Provides client-side computation for:
//! - Planting status and day counters
//! - Form date validation and normalization
//! - Variety harvest planning
//! - Offline report generation

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::report::*;
pub use shared::types::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn parse(s: &str) -> Result<NaiveDate, JsValue> {
    shared::parse_date_string(s).map_err(js_error)
}

fn parse_optional(s: Option<String>) -> Result<Option<NaiveDate>, JsValue> {
    s.filter(|s| !s.is_empty()).map(|s| parse(&s)).transpose()
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::debug_1(&JsValue::from_str("microgreens-wasm loaded"));
}

/// Lifecycle status (`sembrado`, `creciendo`, `listo`, `cosechado`) for `today`
///
/// Empty strings count as missing optional dates.
#[wasm_bindgen]
pub fn planting_status(
    date_planted: &str,
    dome_date: Option<String>,
    light_date: Option<String>,
    expected_harvest: &str,
    actual_harvest_date: Option<String>,
    today: &str,
) -> Result<String, JsValue> {
    let dates = shared::LifecycleDates {
        date_planted: parse(date_planted)?,
        dome_date: parse_optional(dome_date)?,
        light_date: parse_optional(light_date)?,
        expected_harvest: parse(expected_harvest)?,
        actual_harvest_date: parse_optional(actual_harvest_date)?,
    };
    Ok(shared::derive_status(&dates, parse(today)?).as_str().to_string())
}

/// Days until the expected harvest; negative when overdue
#[wasm_bindgen]
pub fn days_until_harvest(expected_harvest: &str, today: &str) -> Result<i32, JsValue> {
    let days = shared::days_between(parse(today)?, parse(expected_harvest)?);
    i32::try_from(days).map_err(js_error)
}

/// `true` iff `s` is `YYYY-MM-DD` and names a real calendar day
#[wasm_bindgen]
pub fn is_valid_date(s: &str) -> bool {
    shared::is_valid_date_string(s)
}

/// Normalize a date or timestamp into the browser's local `YYYY-MM-DD`
///
/// `utc_offset_minutes` is minutes east of UTC, i.e.
/// `-new Date().getTimezoneOffset()`.
#[wasm_bindgen]
pub fn iso_to_local_date(s: &str, utc_offset_minutes: i32) -> Result<String, JsValue> {
    let offset = shared::fixed_offset_from_minutes(utc_offset_minutes)
        .ok_or_else(|| js_error(format!("UTC offset out of range: {}", utc_offset_minutes)))?;
    shared::iso_to_local_date_string(s, &offset).map_err(js_error)
}

/// Local calendar date of a JavaScript `Date` as `YYYY-MM-DD`
#[wasm_bindgen]
pub fn local_date_string(date: &js_sys::Date) -> Result<String, JsValue> {
    if date.get_time().is_nan() {
        return Err(js_error("Invalid Date"));
    }
    // getMonth is zero-based
    local_ymd_string(
        date.get_full_year() as i32,
        date.get_month() + 1,
        date.get_date(),
    )
}

fn local_ymd_string(year: i32, month: u32, day: u32) -> Result<String, JsValue> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(shared::format_date)
        .ok_or_else(|| js_error("Invalid Date"))
}

/// Expected harvest date for a catalog variety sown on `date_planted`
#[wasm_bindgen]
pub fn expected_harvest_for_variety(name: &str, date_planted: &str) -> Result<String, JsValue> {
    let catalog = shared::VarietyCatalog::default();
    let variety = catalog
        .find(name)
        .ok_or_else(|| js_error(format!("Unknown variety: {}", name)))?;
    Ok(shared::format_date(variety.expected_harvest(parse(date_planted)?)))
}

#[derive(Serialize)]
struct ReportJson {
    columns: Vec<&'static str>,
    labels: Vec<&'static str>,
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    summary: ReportSummary,
}

fn report_json(plantings_json: &str, config_json: &str, today: NaiveDate) -> Result<String, String> {
    let plantings: Vec<Planting> = serde_json::from_str(plantings_json)
        .map_err(|e| format!("Invalid plantings JSON: {}", e))?;
    let config: ReportConfig = if config_json.trim().is_empty() {
        ReportConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(|e| format!("Invalid report config JSON: {}", e))?
    };

    let report = build_report(&plantings, &config, today);
    let json = ReportJson {
        columns: report.headers(),
        labels: report.columns.iter().map(|c| c.label()).collect(),
        rows: report.json_rows(),
        summary: report.summary,
    };
    serde_json::to_string(&json).map_err(|e| format!("Report serialization failed: {}", e))
}

/// Filter, sort and project plantings into a JSON report
#[wasm_bindgen]
pub fn build_report_json(plantings_json: &str, config_json: &str, today: &str) -> Result<String, JsValue> {
    report_json(plantings_json, config_json, parse(today)?).map_err(js_error)
}
