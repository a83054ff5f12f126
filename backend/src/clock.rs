//! Source of "today" for the derivation core
//!
//! Services never read the system clock directly; they ask the clock held
//! in the application state so tests can pin the date.

use chrono::{FixedOffset, NaiveDate, Utc};

/// Provides the current calendar date in the farm's timezone
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_system_clock_stays_within_a_day_of_utc() {
        let utc_today = Utc::now().date_naive();
        let east = SystemClock::new(FixedOffset::east_opt(14 * 3600).unwrap()).today();
        let west = SystemClock::new(FixedOffset::west_opt(12 * 3600).unwrap()).today();

        assert!((east - utc_today).num_days().abs() <= 1);
        assert!((west - utc_today).num_days().abs() <= 1);
        assert!(east >= west);
    }
}
