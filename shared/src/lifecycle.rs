//! Planting lifecycle derivation
//!
//! Status is derived, not stored: every read recomputes it from the
//! planting's dates and an explicitly supplied `today`. The `status` field
//! on [`Planting`] is only a cache of the last derivation and is rewritten
//! by [`refresh_status`]; editing a date can therefore never leave a stale
//! status behind. Nothing in this module reads the system clock.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{GrowthPhase, Planting, PlantingStatus};

/// The dates that drive a planting's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleDates {
    pub date_planted: NaiveDate,
    pub dome_date: Option<NaiveDate>,
    pub light_date: Option<NaiveDate>,
    pub expected_harvest: NaiveDate,
    pub actual_harvest_date: Option<NaiveDate>,
}

impl From<&Planting> for LifecycleDates {
    fn from(planting: &Planting) -> Self {
        Self {
            date_planted: planting.date_planted,
            dome_date: planting.dome_date,
            light_date: planting.light_date,
            expected_harvest: planting.expected_harvest,
            actual_harvest_date: planting.actual_harvest_date,
        }
    }
}

impl LifecycleDates {
    /// First day of the growing stage: the dome date, else the light date
    pub fn growth_start(&self) -> Option<NaiveDate> {
        self.dome_date.or(self.light_date)
    }
}

/// Everything list, detail and calendar views show about a planting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleSnapshot {
    pub status: PlantingStatus,
    /// Dome or light while `status` is `creciendo`
    pub growth_phase: Option<GrowthPhase>,
    /// Whole days since sowing; 0 while the sowing date is in the future
    pub days_from_planting: i64,
    /// Set when `today` precedes the sowing date
    pub not_yet_planted: bool,
    /// Negative once the expected harvest date has passed
    pub days_until_harvest: i64,
    pub is_overdue: bool,
    pub is_ready_for_harvest: bool,
    pub efficiency_percent: Option<Decimal>,
}

/// Derive the lifecycle status for `today`
pub fn derive_status(dates: &LifecycleDates, today: NaiveDate) -> PlantingStatus {
    if dates.actual_harvest_date.is_some() {
        return PlantingStatus::Cosechado;
    }
    if today >= dates.expected_harvest {
        return PlantingStatus::Listo;
    }
    match dates.growth_start() {
        Some(start) if today >= start => PlantingStatus::Creciendo,
        _ => PlantingStatus::Sembrado,
    }
}

/// Sub-stage of a planting that is currently growing
pub fn growth_phase(dates: &LifecycleDates, today: NaiveDate) -> Option<GrowthPhase> {
    if derive_status(dates, today) != PlantingStatus::Creciendo {
        return None;
    }
    match dates.light_date {
        Some(light) if today >= light => Some(GrowthPhase::Light),
        _ => Some(GrowthPhase::Dome),
    }
}

/// Signed whole days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Days since sowing, clamped to 0 when `today` precedes the sowing date
pub fn days_from_planting(dates: &LifecycleDates, today: NaiveDate) -> i64 {
    days_between(dates.date_planted, today).max(0)
}

/// Days until the expected harvest; negative when overdue
pub fn days_until_harvest(dates: &LifecycleDates, today: NaiveDate) -> i64 {
    days_between(today, dates.expected_harvest)
}

/// `true` while the planting is ready to cut
pub fn is_ready_for_harvest(dates: &LifecycleDates, today: NaiveDate) -> bool {
    derive_status(dates, today) == PlantingStatus::Listo
}

/// A harvest may be recorded until one exists
pub fn can_record_harvest(dates: &LifecycleDates) -> bool {
    dates.actual_harvest_date.is_none()
}

/// Deviation of the real growth cycle from the planned one, in percent
///
/// Negative means harvested earlier than planned. `None` until harvested,
/// or when the planned cycle is not at least one day long.
pub fn efficiency_percent(dates: &LifecycleDates) -> Option<Decimal> {
    let actual_harvest = dates.actual_harvest_date?;
    let planned_days = days_between(dates.date_planted, dates.expected_harvest);
    if planned_days <= 0 {
        return None;
    }
    let actual_days = days_between(dates.date_planted, actual_harvest);

    let deviation = Decimal::from(actual_days - planned_days) * Decimal::ONE_HUNDRED
        / Decimal::from(planned_days);
    Some(deviation.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Full derivation for one planting
pub fn snapshot(dates: &LifecycleDates, today: NaiveDate) -> LifecycleSnapshot {
    let status = derive_status(dates, today);
    let days_until_harvest = days_until_harvest(dates, today);

    LifecycleSnapshot {
        status,
        growth_phase: growth_phase(dates, today),
        days_from_planting: days_from_planting(dates, today),
        not_yet_planted: today < dates.date_planted,
        days_until_harvest,
        is_overdue: days_until_harvest < 0 && !status.is_terminal(),
        is_ready_for_harvest: status == PlantingStatus::Listo,
        efficiency_percent: efficiency_percent(dates),
    }
}

/// Rewrite the cached status on a planting; returns the derived status
pub fn refresh_status(planting: &mut Planting, today: NaiveDate) -> PlantingStatus {
    let status = derive_status(&LifecycleDates::from(&*planting), today);
    planting.status = status;
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(planted: NaiveDate, expected: NaiveDate) -> LifecycleDates {
        LifecycleDates {
            date_planted: planted,
            dome_date: None,
            light_date: None,
            expected_harvest: expected,
            actual_harvest_date: None,
        }
    }

    #[test]
    fn test_ready_on_expected_harvest_day() {
        let d = dates(date(2025, 1, 5), date(2025, 1, 12));
        let snap = snapshot(&d, date(2025, 1, 12));

        assert_eq!(snap.status, PlantingStatus::Listo);
        assert_eq!(snap.days_from_planting, 7);
        assert_eq!(snap.days_until_harvest, 0);
        assert!(snap.is_ready_for_harvest);
        assert!(!snap.is_overdue);
    }

    #[test]
    fn test_harvested_is_terminal_regardless_of_today() {
        let mut d = dates(date(2025, 1, 5), date(2025, 1, 12));
        d.actual_harvest_date = Some(date(2025, 1, 10));
        d.dome_date = Some(date(2025, 1, 6));

        for today in [date(2024, 12, 1), date(2025, 1, 8), date(2025, 1, 12), date(2026, 1, 1)] {
            assert_eq!(derive_status(&d, today), PlantingStatus::Cosechado);
        }
    }

    #[test]
    fn test_sown_until_dome_date() {
        let mut d = dates(date(2025, 1, 5), date(2025, 1, 13));
        d.dome_date = Some(date(2025, 1, 6));
        d.light_date = Some(date(2025, 1, 9));

        assert_eq!(derive_status(&d, date(2025, 1, 5)), PlantingStatus::Sembrado);
        assert_eq!(derive_status(&d, date(2025, 1, 6)), PlantingStatus::Creciendo);
        assert_eq!(growth_phase(&d, date(2025, 1, 6)), Some(GrowthPhase::Dome));
        assert_eq!(growth_phase(&d, date(2025, 1, 9)), Some(GrowthPhase::Light));
        assert_eq!(derive_status(&d, date(2025, 1, 13)), PlantingStatus::Listo);
        assert_eq!(growth_phase(&d, date(2025, 1, 13)), None);
    }

    #[test]
    fn test_light_date_alone_starts_growing() {
        let mut d = dates(date(2025, 1, 5), date(2025, 1, 13));
        d.light_date = Some(date(2025, 1, 8));

        assert_eq!(derive_status(&d, date(2025, 1, 7)), PlantingStatus::Sembrado);
        assert_eq!(derive_status(&d, date(2025, 1, 8)), PlantingStatus::Creciendo);
        assert_eq!(growth_phase(&d, date(2025, 1, 8)), Some(GrowthPhase::Light));
    }

    #[test]
    fn test_no_stage_dates_stays_sown_until_ready() {
        let d = dates(date(2025, 1, 5), date(2025, 1, 13));
        assert_eq!(derive_status(&d, date(2025, 1, 12)), PlantingStatus::Sembrado);
    }

    #[test]
    fn test_future_planting_is_clamped_and_flagged() {
        let d = dates(date(2025, 2, 1), date(2025, 2, 10));
        let snap = snapshot(&d, date(2025, 1, 28));

        assert_eq!(snap.status, PlantingStatus::Sembrado);
        assert_eq!(snap.days_from_planting, 0);
        assert!(snap.not_yet_planted);
        assert_eq!(snap.days_until_harvest, 13);
    }

    #[test]
    fn test_overdue_has_negative_days() {
        let d = dates(date(2025, 1, 5), date(2025, 1, 12));
        let snap = snapshot(&d, date(2025, 1, 15));

        assert_eq!(snap.status, PlantingStatus::Listo);
        assert_eq!(snap.days_until_harvest, -3);
        assert!(snap.is_overdue);
    }

    #[test]
    fn test_inverted_dates_are_permissive() {
        let d = dates(date(2025, 1, 12), date(2025, 1, 5));
        let snap = snapshot(&d, date(2025, 1, 12));

        assert_eq!(snap.status, PlantingStatus::Listo);
        assert_eq!(snap.days_until_harvest, -7);
        assert_eq!(snap.days_from_planting, 0);
        assert_eq!(efficiency_percent(&d), None);
    }

    #[test]
    fn test_efficiency_percent() {
        let mut d = dates(date(2025, 1, 5), date(2025, 1, 12));
        assert_eq!(efficiency_percent(&d), None);

        d.actual_harvest_date = Some(date(2025, 1, 10));
        assert_eq!(efficiency_percent(&d), Some(Decimal::from_str("-28.57").unwrap()));

        d.actual_harvest_date = Some(date(2025, 1, 12));
        assert_eq!(efficiency_percent(&d), Some(Decimal::ZERO));

        d.actual_harvest_date = Some(date(2025, 1, 19));
        assert_eq!(efficiency_percent(&d), Some(Decimal::ONE_HUNDRED));
    }

    #[test]
    fn test_harvested_is_never_overdue() {
        let mut d = dates(date(2025, 1, 5), date(2025, 1, 12));
        d.actual_harvest_date = Some(date(2025, 1, 14));
        let snap = snapshot(&d, date(2025, 2, 1));
        assert!(!snap.is_overdue);
        assert!(!snap.is_ready_for_harvest);
        assert!(!can_record_harvest(&d));
    }
}
