//! Report filtering and sorting property-based and unit tests
//!
//! Covers:
//! - Adding a filter never grows the result
//! - Sorting is stable
//! - Projection keeps column order

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use shared::{
    build_report, filter_plantings, sort_entries, DateRange, Planting, PlantingStatus,
    QuantityRange, ReportColumn, ReportConfig, ReportEntry, ReportValue, SortDirection, SortSpec,
};
use uuid::Uuid;

const TODAY: (i32, u32, u32) = (2025, 1, 20);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 20)
        .unwrap()
        .checked_add_days(Days::new(offset))
        .unwrap()
}

// ============================================================================
// Property Test Strategies
// ============================================================================

const TRAYS: [&str; 3] = ["A-1", "A-2", "B-1"];
const NAMES: [&str; 4] = ["Rábano", "girasol", "Guisante", "albahaca"];

fn planting_strategy() -> impl Strategy<Value = Planting> {
    (
        0..60u64,
        1..15u64,
        prop::option::of(0..20u64),
        0..NAMES.len(),
        0..TRAYS.len(),
        1..200u32,
        any::<u128>(),
    )
        .prop_map(|(planted, cycle, harvested_after, name, tray, quantity, id)| Planting {
            id: Uuid::from_u128(id),
            plant_name: NAMES[name].to_string(),
            date_planted: day(planted),
            dome_date: None,
            light_date: Some(day(planted + 1)),
            expected_harvest: day(planted + cycle),
            actual_harvest_date: harvested_after.map(|d| day(planted + d)),
            quantity,
            tray_number: TRAYS[tray].to_string(),
            status: PlantingStatus::Sembrado,
            notes: None,
            created_at: stamp(),
            updated_at: stamp(),
        })
}

fn config_strategy() -> impl Strategy<Value = ReportConfig> {
    (
        prop::option::of((0..60u64, 0..60u64)),
        prop::collection::vec(prop::sample::select(PlantingStatus::ALL.to_vec()), 0..3),
        prop::collection::vec(prop::sample::select(TRAYS.to_vec()), 0..2),
        prop::option::of(1..200u32),
        prop::option::of(1..200u32),
    )
        .prop_map(|(range, statuses, trays, min, max)| ReportConfig {
            date_range: range.map(|(a, b)| DateRange::new(day(a.min(b)), day(a.max(b)))),
            statuses,
            trays: trays.into_iter().map(str::to_string).collect(),
            quantity: QuantityRange { min, max },
            ..Default::default()
        })
}

fn sort_key_strategy() -> impl Strategy<Value = SortSpec> {
    (
        prop::sample::select(vec![
            ReportColumn::PlantName,
            ReportColumn::TrayNumber,
            ReportColumn::Status,
            ReportColumn::ActualHarvestDate,
            ReportColumn::Quantity,
        ]),
        any::<bool>(),
    )
        .prop_map(|(field, desc)| SortSpec {
            field,
            direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Tightening any filter can only remove rows
    #[test]
    fn prop_extra_filter_never_grows_result(
        plantings in prop::collection::vec(planting_strategy(), 0..30),
        config in config_strategy(),
        extra_status in prop::sample::select(PlantingStatus::ALL.to_vec()),
        extra_min in 1..200u32,
    ) {
        let base = filter_plantings(&plantings, &config, today()).len();

        let mut by_status = config.clone();
        if by_status.statuses.is_empty() {
            by_status.statuses.push(extra_status);
        } else {
            by_status.statuses.truncate(1);
        }
        prop_assert!(filter_plantings(&plantings, &by_status, today()).len() <= base);

        let mut by_quantity = config.clone();
        by_quantity.quantity.min = Some(by_quantity.quantity.min.map_or(extra_min, |m| m.max(extra_min)));
        prop_assert!(filter_plantings(&plantings, &by_quantity, today()).len() <= base);

        let unfiltered = filter_plantings(&plantings, &ReportConfig::default(), today()).len();
        prop_assert_eq!(unfiltered, plantings.len());
    }

    /// Rows that compare equal keep their input order
    #[test]
    fn prop_sort_is_stable(
        plantings in prop::collection::vec(planting_strategy(), 0..30),
        key in sort_key_strategy(),
    ) {
        let mut entries: Vec<ReportEntry<'_>> =
            plantings.iter().map(|p| ReportEntry::new(p, today())).collect();
        let positions: std::collections::HashMap<*const Planting, usize> = plantings
            .iter()
            .enumerate()
            .map(|(i, p)| (p as *const Planting, i))
            .collect();

        sort_entries(&mut entries, &[key]);

        for pair in entries.windows(2) {
            let ordering = pair[0]
                .value(key.field)
                .compare_directed(&pair[1].value(key.field), key.direction);
            prop_assert_ne!(ordering, std::cmp::Ordering::Greater);
            if ordering == std::cmp::Ordering::Equal {
                let a = positions[&(pair[0].planting as *const Planting)];
                let b = positions[&(pair[1].planting as *const Planting)];
                prop_assert!(a < b);
            }
        }
    }

    /// Rows carry exactly the configured columns in order
    #[test]
    fn prop_rows_follow_column_order(
        plantings in prop::collection::vec(planting_strategy(), 1..10),
        columns in prop::collection::vec(prop::sample::select(vec![
            ReportColumn::Id,
            ReportColumn::Quantity,
            ReportColumn::Status,
            ReportColumn::DaysUntilHarvest,
        ]), 1..4),
    ) {
        let config = ReportConfig { columns: columns.clone(), ..Default::default() };
        let report = build_report(&plantings, &config, today());

        prop_assert_eq!(&report.columns, &columns);
        for row in &report.rows {
            prop_assert_eq!(row.cells.len(), columns.len());
        }
        prop_assert_eq!(report.summary.total_rows, plantings.len());
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn fixture() -> Vec<Planting> {
    let make = |n: u128, name: &str, planted: NaiveDate, expected: NaiveDate, actual: Option<NaiveDate>, tray: &str| Planting {
        id: Uuid::from_u128(n),
        plant_name: name.to_string(),
        date_planted: planted,
        dome_date: None,
        light_date: None,
        expected_harvest: expected,
        actual_harvest_date: actual,
        quantity: 10 * n as u32,
        tray_number: tray.to_string(),
        status: PlantingStatus::Sembrado,
        notes: None,
        created_at: stamp(),
        updated_at: stamp(),
    };

    vec![
        make(1, "Rábano", date(1, 2), date(1, 10), None, "A-1"),
        make(2, "Girasol", date(1, 8), date(1, 18), None, "A-2"),
        make(3, "Guisante", date(1, 5), date(1, 17), Some(date(1, 16)), "A-1"),
        make(4, "Brócoli", date(1, 12), date(1, 22), None, "B-1"),
        make(5, "Mostaza", date(1, 11), date(1, 20), None, "B-2"),
        make(6, "Rúcula", NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(), date(1, 6), None, "C-1"),
    ]
}

#[test]
fn test_ready_in_january_sorted_newest_first() {
    let config = ReportConfig {
        statuses: vec![PlantingStatus::Listo],
        date_range: Some(DateRange::new(date(1, 1), date(1, 31))),
        ..Default::default()
    };
    let report = build_report(&fixture(), &config, today());

    let ids: Vec<u128> = report.rows.iter().map(|r| r.planting_id.as_u128()).collect();
    assert_eq!(ids, vec![5, 2, 1]);
    assert_eq!(report.summary.total_rows, 3);
    assert_eq!(report.summary.total_quantity, 80);
}

#[test]
fn test_multi_key_sort() {
    let config = ReportConfig {
        columns: vec![ReportColumn::TrayNumber, ReportColumn::PlantName],
        sort: vec![
            SortSpec { field: ReportColumn::TrayNumber, direction: SortDirection::Asc },
            SortSpec { field: ReportColumn::PlantName, direction: SortDirection::Desc },
        ],
        ..Default::default()
    };
    let report = build_report(&fixture(), &config, today());

    let first_two: Vec<&ReportValue> = report.rows.iter().take(2).map(|r| &r.cells[1]).collect();
    assert_eq!(
        first_two,
        vec![
            &ReportValue::Text("Rábano".to_string()),
            &ReportValue::Text("Guisante".to_string()),
        ]
    );
}

#[test]
fn test_missing_harvest_dates_sort_last() {
    let config = ReportConfig {
        sort: vec![SortSpec { field: ReportColumn::ActualHarvestDate, direction: SortDirection::Asc }],
        ..Default::default()
    };
    let report = build_report(&fixture(), &config, today());
    assert_eq!(report.rows[0].planting_id.as_u128(), 3);
}

#[test]
fn test_missing_harvest_dates_sort_last_descending() {
    let config = ReportConfig {
        sort: vec![SortSpec { field: ReportColumn::ActualHarvestDate, direction: SortDirection::Desc }],
        ..Default::default()
    };
    let report = build_report(&fixture(), &config, today());
    assert_eq!(report.rows[0].planting_id.as_u128(), 3);
}
