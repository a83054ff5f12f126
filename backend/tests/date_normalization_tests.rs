//! Date normalization property-based and unit tests
//!
//! Form dates are plain `YYYY-MM-DD` strings interpreted in the farm's
//! local timezone; they must survive a trip through a local instant.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use shared::{
    fixed_offset_from_minutes, format_date, from_local_date_string, is_valid_date_string,
    iso_to_local_date_string, parse_date_string, parse_utc_offset, to_local_date_string,
    DateError,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Offsets that real zones use, including half and quarter hours
const OFFSETS_MINUTES: [i32; 10] = [-720, -600, -300, -210, 0, 60, 330, 345, 570, 840];

fn offset_strategy() -> impl Strategy<Value = FixedOffset> {
    prop::sample::select(OFFSETS_MINUTES.to_vec())
        .prop_map(|minutes| fixed_offset_from_minutes(minutes).unwrap())
}

/// Zones with daylight saving, several of which change clocks at midnight
fn dst_zone_strategy() -> impl Strategy<Value = Tz> {
    prop::sample::select(vec![
        chrono_tz::America::Santiago,
        chrono_tz::America::Asuncion,
        chrono_tz::America::Havana,
        chrono_tz::America::New_York,
        chrono_tz::Asia::Beirut,
        chrono_tz::Europe::London,
        chrono_tz::Australia::Sydney,
        chrono_tz::Australia::Lord_Howe,
    ])
}

/// Instants between 1971 and 2100
fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (31_536_000i64..4_102_444_800i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Dates in the range where zone rules change on whole quarter hours
fn dst_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1971i32..2100, 1u32..=366).prop_filter_map("day exists in year", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2200, 1u32..=366).prop_filter_map("day exists in year", |(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal)
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// to_local -> from_local -> to_local keeps year, month and day
    #[test]
    fn prop_local_round_trip_preserves_ymd(instant in instant_strategy(), offset in offset_strategy()) {
        let local = instant.with_timezone(&offset);
        let s = to_local_date_string(&local);

        let parsed = from_local_date_string(&s, &offset).unwrap();
        prop_assert_eq!(parsed.year(), local.year());
        prop_assert_eq!(parsed.month(), local.month());
        prop_assert_eq!(parsed.day(), local.day());
        prop_assert_eq!(to_local_date_string(&parsed), s);
    }

    /// Parsed dates land on local midnight
    #[test]
    fn prop_parsed_date_is_local_midnight(date in date_strategy(), offset in offset_strategy()) {
        let parsed = from_local_date_string(&format_date(date), &offset).unwrap();
        prop_assert_eq!(parsed.date_naive(), date);
        prop_assert_eq!(parsed.naive_local().time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    /// format -> parse is the identity on calendar dates
    #[test]
    fn prop_format_parse_identity(date in date_strategy()) {
        prop_assert_eq!(parse_date_string(&format_date(date)).unwrap(), date);
    }

    /// An RFC 3339 timestamp normalizes to the date seen in the target zone
    #[test]
    fn prop_rfc3339_uses_target_zone(instant in instant_strategy(), offset in offset_strategy()) {
        let normalized = iso_to_local_date_string(&instant.to_rfc3339(), &offset).unwrap();
        prop_assert_eq!(normalized, format_date(instant.with_timezone(&offset).date_naive()));
    }

    /// Round trip holds in zones that observe daylight saving
    #[test]
    fn prop_dst_round_trip_preserves_ymd(instant in instant_strategy(), tz in dst_zone_strategy()) {
        let local = instant.with_timezone(&tz);
        let s = to_local_date_string(&local);

        let start = from_local_date_string(&s, &tz).unwrap();
        prop_assert_eq!(start.date_naive(), local.date_naive());
        prop_assert_eq!(to_local_date_string(&start), s);
        prop_assert!(start <= local);
    }

    /// The parsed instant is the first of its local day
    #[test]
    fn prop_dst_parsed_instant_starts_the_day(date in dst_date_strategy(), tz in dst_zone_strategy()) {
        let start = from_local_date_string(&format_date(date), &tz).unwrap();
        let previous = (start.clone() - Duration::seconds(1)).with_timezone(&tz);
        prop_assert_eq!(start.date_naive(), date);
        prop_assert!(previous.date_naive() < date);
    }

    /// Anything that is not ten characters is rejected
    #[test]
    fn prop_wrong_length_rejected(s in "[0-9-]{0,9}|[0-9-]{11,14}") {
        prop_assert!(!is_valid_date_string(&s));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_calendar_validity() {
    assert!(is_valid_date_string("2025-02-28"));
    assert!(!is_valid_date_string("2025-02-30"));
    assert!(is_valid_date_string("2024-02-29"));
    assert!(!is_valid_date_string("2100-02-29"));
    assert!(!is_valid_date_string(""));
    assert!(!is_valid_date_string("2025-1-05"));
    assert!(!is_valid_date_string("05/01/2025"));
}

#[test]
fn test_error_kinds() {
    assert!(matches!(parse_date_string("2025/01/05"), Err(DateError::InvalidDateFormat(_))));
    assert!(matches!(parse_date_string("2025-13-01"), Err(DateError::InvalidCalendarDate(_))));
}

#[test]
fn test_late_evening_utc_is_next_day_east() {
    let tokyo = parse_utc_offset("+09:00").unwrap();
    assert_eq!(
        iso_to_local_date_string("2025-01-05T20:30:00Z", &tokyo).unwrap(),
        "2025-01-06"
    );

    let new_york = parse_utc_offset("-05:00").unwrap();
    assert_eq!(
        iso_to_local_date_string("2025-01-06T03:00:00Z", &new_york).unwrap(),
        "2025-01-05"
    );
}

#[test]
fn test_santiago_spring_forward_day() {
    let start = from_local_date_string("2024-09-08", &chrono_tz::America::Santiago).unwrap();
    assert_eq!(start.naive_local().time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    assert_eq!(to_local_date_string(&start), "2024-09-08");
}

#[test]
fn test_bare_date_passes_through() {
    let offset = parse_utc_offset("-03:30").unwrap();
    assert_eq!(iso_to_local_date_string("2025-01-05", &offset).unwrap(), "2025-01-05");
}
