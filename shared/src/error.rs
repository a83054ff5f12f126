//! Error types for the pure planting core

use thiserror::Error;

/// Failure to interpret a calendar date string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not syntactically `YYYY-MM-DD` (or a recognised timestamp)
    #[error("Invalid date format: '{0}' (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    /// Input is well-formed but names a day that does not exist
    #[error("Invalid calendar date: '{0}'")]
    InvalidCalendarDate(String),

    /// UTC offset is not `Z` or `±HH:MM` within one day
    #[error("Invalid UTC offset: '{0}' (expected ±HH:MM)")]
    InvalidUtcOffset(String),
}
