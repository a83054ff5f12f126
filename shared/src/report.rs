//! Report filtering, sorting and projection
//!
//! Builds the exportable row set for a list of plantings. Serialization to
//! CSV or JSON files happens in the callers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::dates::format_date;
use crate::lifecycle::{snapshot, LifecycleDates, LifecycleSnapshot};
use crate::models::{Planting, PlantingStatus};
use crate::types::DateRange;

/// A planting attribute that can be shown or sorted on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportColumn {
    Id,
    PlantName,
    DatePlanted,
    DomeDate,
    LightDate,
    ExpectedHarvest,
    ActualHarvestDate,
    Quantity,
    TrayNumber,
    Status,
    DaysFromPlanting,
    DaysUntilHarvest,
    EfficiencyPercent,
    Notes,
}

impl ReportColumn {
    /// Columns used when a report selects none
    pub const DEFAULT: [ReportColumn; 7] = [
        ReportColumn::PlantName,
        ReportColumn::DatePlanted,
        ReportColumn::ExpectedHarvest,
        ReportColumn::ActualHarvestDate,
        ReportColumn::Quantity,
        ReportColumn::TrayNumber,
        ReportColumn::Status,
    ];

    /// Machine key, used as CSV header and JSON field name
    pub fn key(&self) -> &'static str {
        match self {
            ReportColumn::Id => "id",
            ReportColumn::PlantName => "plant_name",
            ReportColumn::DatePlanted => "date_planted",
            ReportColumn::DomeDate => "dome_date",
            ReportColumn::LightDate => "light_date",
            ReportColumn::ExpectedHarvest => "expected_harvest",
            ReportColumn::ActualHarvestDate => "actual_harvest_date",
            ReportColumn::Quantity => "quantity",
            ReportColumn::TrayNumber => "tray_number",
            ReportColumn::Status => "status",
            ReportColumn::DaysFromPlanting => "days_from_planting",
            ReportColumn::DaysUntilHarvest => "days_until_harvest",
            ReportColumn::EfficiencyPercent => "efficiency_percent",
            ReportColumn::Notes => "notes",
        }
    }

    /// Column heading as shown to growers
    pub fn label(&self) -> &'static str {
        match self {
            ReportColumn::Id => "ID",
            ReportColumn::PlantName => "Tipo de microgreen",
            ReportColumn::DatePlanted => "Fecha de siembra",
            ReportColumn::DomeDate => "Inicio cúpula",
            ReportColumn::LightDate => "Inicio luz",
            ReportColumn::ExpectedHarvest => "Cosecha esperada",
            ReportColumn::ActualHarvestDate => "Cosecha real",
            ReportColumn::Quantity => "Cantidad sembrada",
            ReportColumn::TrayNumber => "Bandeja",
            ReportColumn::Status => "Estado",
            ReportColumn::DaysFromPlanting => "Días desde siembra",
            ReportColumn::DaysUntilHarvest => "Días para cosecha",
            ReportColumn::EfficiencyPercent => "Eficiencia (%)",
            ReportColumn::Notes => "Notas",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One key of a multi-key sort
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub field: ReportColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort applied when a report specifies none
    pub const DEFAULT: SortSpec = SortSpec {
        field: ReportColumn::DatePlanted,
        direction: SortDirection::Desc,
    };
}

/// Inclusive quantity bounds; either side may be open
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuantityRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl QuantityRange {
    pub fn contains(&self, quantity: u32) -> bool {
        self.min.map_or(true, |min| quantity >= min) && self.max.map_or(true, |max| quantity <= max)
    }
}

/// What to include in a report and how to order it
///
/// Empty status and tray sets mean "no filter".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub date_range: Option<DateRange>,
    pub statuses: Vec<PlantingStatus>,
    pub trays: Vec<String>,
    pub quantity: QuantityRange,
    pub columns: Vec<ReportColumn>,
    pub sort: Vec<SortSpec>,
}

impl ReportConfig {
    /// `true` iff the planting passes every active filter
    pub fn matches(&self, planting: &Planting, status: PlantingStatus) -> bool {
        let in_range = self
            .date_range
            .as_ref()
            .map_or(true, |range| range.contains(planting.date_planted));
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&status);
        let tray_ok = self.trays.is_empty() || self.trays.iter().any(|t| *t == planting.tray_number);

        in_range && status_ok && tray_ok && self.quantity.contains(planting.quantity)
    }

    /// Selected columns, falling back to the defaults
    pub fn effective_columns(&self) -> Vec<ReportColumn> {
        if self.columns.is_empty() {
            ReportColumn::DEFAULT.to_vec()
        } else {
            self.columns.clone()
        }
    }

    /// Sort keys, falling back to sowing date descending
    pub fn effective_sort(&self) -> Vec<SortSpec> {
        if self.sort.is_empty() {
            vec![SortSpec::DEFAULT]
        } else {
            self.sort.clone()
        }
    }
}

/// A single report cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReportValue {
    Empty,
    Status(PlantingStatus),
    Date(NaiveDate),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

impl ReportValue {
    fn from_date(date: Option<NaiveDate>) -> Self {
        date.map_or(ReportValue::Empty, ReportValue::Date)
    }

    fn from_text(text: Option<&str>) -> Self {
        text.map_or(ReportValue::Empty, |t| ReportValue::Text(t.to_string()))
    }

    /// Compare two present cells of the same column
    ///
    /// Text uses [`collate`].
    pub fn compare(&self, other: &ReportValue) -> Ordering {
        match (self, other) {
            (ReportValue::Status(a), ReportValue::Status(b)) => a.cmp(b),
            (ReportValue::Date(a), ReportValue::Date(b)) => a.cmp(b),
            (ReportValue::Integer(a), ReportValue::Integer(b)) => a.cmp(b),
            (ReportValue::Decimal(a), ReportValue::Decimal(b)) => a.cmp(b),
            (ReportValue::Text(a), ReportValue::Text(b)) => collate(a, b),
            _ => Ordering::Equal,
        }
    }

    /// Compare for a sort in `direction`; missing values go last either way
    pub fn compare_directed(&self, other: &ReportValue, direction: SortDirection) -> Ordering {
        match (self, other) {
            (ReportValue::Empty, ReportValue::Empty) => Ordering::Equal,
            (ReportValue::Empty, _) => Ordering::Greater,
            (_, ReportValue::Empty) => Ordering::Less,
            _ => match direction {
                SortDirection::Asc => self.compare(other),
                SortDirection::Desc => self.compare(other).reverse(),
            },
        }
    }
}

/// Letters with case and accents folded; `ñ` is its own letter after `n`
fn collation_key(text: &str) -> Vec<(char, bool)> {
    let mut key: Vec<(char, bool)> = Vec::with_capacity(text.len());
    for c in text.nfd().flat_map(char::to_lowercase) {
        if c == '\u{0303}' && key.last() == Some(&('n', false)) {
            if let Some(last) = key.last_mut() {
                last.1 = true;
            }
        } else if !is_combining_mark(c) {
            key.push((c, false));
        }
    }
    key
}

/// Case-insensitive Spanish-style text ordering
///
/// Base letters decide first, so `Ápio` sorts with the A's. Names equal
/// after folding fall back to the lowercase text, then the raw text.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

impl std::fmt::Display for ReportValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportValue::Empty => Ok(()),
            ReportValue::Status(status) => write!(f, "{}", status.as_str()),
            ReportValue::Date(date) => write!(f, "{}", format_date(*date)),
            ReportValue::Integer(n) => write!(f, "{}", n),
            ReportValue::Decimal(d) => write!(f, "{}", d),
            ReportValue::Text(t) => write!(f, "{}", t),
        }
    }
}

/// Value of `column` for a planting and its derived snapshot
pub fn column_value(
    planting: &Planting,
    derived: &LifecycleSnapshot,
    column: ReportColumn,
) -> ReportValue {
    match column {
        ReportColumn::Id => ReportValue::Text(planting.id.to_string()),
        ReportColumn::PlantName => ReportValue::Text(planting.plant_name.clone()),
        ReportColumn::DatePlanted => ReportValue::Date(planting.date_planted),
        ReportColumn::DomeDate => ReportValue::from_date(planting.dome_date),
        ReportColumn::LightDate => ReportValue::from_date(planting.light_date),
        ReportColumn::ExpectedHarvest => ReportValue::Date(planting.expected_harvest),
        ReportColumn::ActualHarvestDate => ReportValue::from_date(planting.actual_harvest_date),
        ReportColumn::Quantity => ReportValue::Integer(i64::from(planting.quantity)),
        ReportColumn::TrayNumber => ReportValue::Text(planting.tray_number.clone()),
        ReportColumn::Status => ReportValue::Status(derived.status),
        ReportColumn::DaysFromPlanting => ReportValue::Integer(derived.days_from_planting),
        ReportColumn::DaysUntilHarvest => ReportValue::Integer(derived.days_until_harvest),
        ReportColumn::EfficiencyPercent => derived
            .efficiency_percent
            .map_or(ReportValue::Empty, ReportValue::Decimal),
        ReportColumn::Notes => ReportValue::from_text(planting.notes.as_deref()),
    }
}

/// A planting paired with its derivation for `today`
#[derive(Debug, Clone, Copy)]
pub struct ReportEntry<'a> {
    pub planting: &'a Planting,
    pub derived: LifecycleSnapshot,
}

impl<'a> ReportEntry<'a> {
    pub fn new(planting: &'a Planting, today: NaiveDate) -> Self {
        Self {
            planting,
            derived: snapshot(&LifecycleDates::from(planting), today),
        }
    }

    pub fn value(&self, column: ReportColumn) -> ReportValue {
        column_value(self.planting, &self.derived, column)
    }
}

/// Keep the plantings that pass every filter, in input order
pub fn filter_plantings<'a>(
    plantings: &'a [Planting],
    config: &ReportConfig,
    today: NaiveDate,
) -> Vec<ReportEntry<'a>> {
    plantings
        .iter()
        .map(|p| ReportEntry::new(p, today))
        .filter(|entry| config.matches(entry.planting, entry.derived.status))
        .collect()
}

/// Stable multi-key sort; earlier keys take precedence
pub fn sort_entries(entries: &mut [ReportEntry<'_>], sort: &[SortSpec]) {
    entries.sort_by(|a, b| {
        sort.iter()
            .map(|spec| {
                a.value(spec.field)
                    .compare_directed(&b.value(spec.field), spec.direction)
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// One exported row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub planting_id: Uuid,
    pub cells: Vec<ReportValue>,
}

impl ReportRow {
    /// Row as a JSON object keyed by column key
    pub fn to_json(&self, columns: &[ReportColumn]) -> serde_json::Map<String, serde_json::Value> {
        columns
            .iter()
            .zip(&self.cells)
            .map(|(column, cell)| {
                let value = serde_json::to_value(cell).unwrap_or(serde_json::Value::Null);
                (column.key().to_string(), value)
            })
            .collect()
    }
}

/// Aggregate figures over the reported rows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReportSummary {
    pub total_rows: usize,
    pub by_status: BTreeMap<PlantingStatus, usize>,
    pub total_quantity: u64,
    /// Mean efficiency of the harvested rows
    pub average_efficiency_percent: Option<Decimal>,
}

impl ReportSummary {
    pub fn from_entries(entries: &[ReportEntry<'_>]) -> Self {
        let mut by_status = BTreeMap::new();
        let mut total_quantity = 0u64;
        let mut efficiencies = Vec::new();

        for entry in entries {
            *by_status.entry(entry.derived.status).or_insert(0) += 1;
            total_quantity += u64::from(entry.planting.quantity);
            if let Some(efficiency) = entry.derived.efficiency_percent {
                efficiencies.push(efficiency);
            }
        }

        let average_efficiency_percent = if efficiencies.is_empty() {
            None
        } else {
            let total: Decimal = efficiencies.iter().sum();
            Some(
                (total / Decimal::from(efficiencies.len()))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            )
        };

        Self {
            total_rows: entries.len(),
            by_status,
            total_quantity,
            average_efficiency_percent,
        }
    }
}

/// A filtered, sorted, projected report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub generated_for: NaiveDate,
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

impl Report {
    /// Column keys in display order
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.key()).collect()
    }

    /// Rows as JSON objects keyed by column key
    pub fn json_rows(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows.iter().map(|row| row.to_json(&self.columns)).collect()
    }
}

/// Filter, sort and project plantings for export
pub fn build_report(plantings: &[Planting], config: &ReportConfig, today: NaiveDate) -> Report {
    let mut entries = filter_plantings(plantings, config, today);
    sort_entries(&mut entries, &config.effective_sort());

    let columns = config.effective_columns();
    let rows = entries
        .iter()
        .map(|entry| ReportRow {
            planting_id: entry.planting.id,
            cells: columns.iter().map(|column| entry.value(*column)).collect(),
        })
        .collect();

    Report {
        generated_for: today,
        summary: ReportSummary::from_entries(&entries),
        columns,
        rows,
    }
}
