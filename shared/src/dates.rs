//! Calendar date normalization
//!
//! Dates cross the form/API boundary as `YYYY-MM-DD` strings in the farm's
//! local timezone. Nothing here goes through a UTC date, so a date picker's
//! local midnight never turns into the previous day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::DateError;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts without an offset, read as already-local wall time
const LOCAL_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Minutes in a day, scanned in quarter hours when midnight is skipped
const MINUTES_PER_DAY: u32 = 24 * 60;

/// True iff `s` has the exact `YYYY-MM-DD` shape (digits and two dashes)
fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() })
}

/// Format a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` string into a calendar date
pub fn parse_date_string(s: &str) -> Result<NaiveDate, DateError> {
    if !has_date_shape(s) {
        return Err(DateError::InvalidDateFormat(s.to_string()));
    }

    // Shape check guarantees ASCII digits at these positions
    let year: i32 = s[0..4]
        .parse()
        .map_err(|_| DateError::InvalidDateFormat(s.to_string()))?;
    let month: u32 = s[5..7]
        .parse()
        .map_err(|_| DateError::InvalidDateFormat(s.to_string()))?;
    let day: u32 = s[8..10]
        .parse()
        .map_err(|_| DateError::InvalidDateFormat(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateError::InvalidCalendarDate(s.to_string()))
}

/// `true` iff `s` is `YYYY-MM-DD` and names a real calendar day
pub fn is_valid_date_string(s: &str) -> bool {
    parse_date_string(s).is_ok()
}

/// Local calendar date of `datetime` as `YYYY-MM-DD`
///
/// Uses the year/month/day as seen in the datetime's own timezone.
pub fn to_local_date_string<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    format_date(datetime.date_naive())
}

/// Parse `YYYY-MM-DD` into the first instant of that day in `tz`
///
/// Normally local midnight. When a zone skips midnight (a DST change at
/// 00:00) the earliest existing quarter hour of the same day is used.
pub fn from_local_date_string<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Tz>, DateError> {
    let date = parse_date_string(s)?;
    start_of_local_day(date, tz).ok_or_else(|| DateError::InvalidCalendarDate(s.to_string()))
}

/// First existing instant of `date` in `tz`
pub fn start_of_local_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    (0..MINUTES_PER_DAY).step_by(15).find_map(|minute| {
        let local = date.and_hms_opt(minute / 60, minute % 60, 0)?;
        tz.from_local_datetime(&local).earliest()
    })
}

/// Normalize a bare date or a timestamp into a local `YYYY-MM-DD`
///
/// - `YYYY-MM-DD` passes through once validated.
/// - RFC 3339 timestamps carry their own offset and are moved into `tz`
///   before the date is taken.
/// - Timestamps without an offset are already local wall time.
pub fn iso_to_local_date_string<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<String, DateError> {
    if has_date_shape(s) {
        return parse_date_string(s).map(format_date);
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(s) {
        return Ok(to_local_date_string(&with_offset.with_timezone(tz)));
    }

    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| format_date(naive.date()))
        .ok_or_else(|| DateError::InvalidDateFormat(s.to_string()))
}

/// Build a fixed offset from minutes east of UTC
pub fn fixed_offset_from_minutes(minutes_east: i32) -> Option<FixedOffset> {
    minutes_east
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

/// Parse `Z`, `+HH:MM` or `-HH:MM` into a fixed offset
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, DateError> {
    let invalid = || DateError::InvalidUtcOffset(s.to_string());

    if s.eq_ignore_ascii_case("z") {
        return fixed_offset_from_minutes(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    fixed_offset_from_minutes(sign * (hours * 60 + minutes)).ok_or_else(invalid)
}
