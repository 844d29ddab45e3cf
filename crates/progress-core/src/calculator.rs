//! Year progress calculation.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Check whether a year is a Gregorian leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a year (365 or 366).
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Progress through the calendar year at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearProgress {
    /// Calendar year of the instant.
    pub year: i32,
    /// Fraction of the year elapsed, times 100. Always in `[0, 100)`.
    pub percentage: f64,
    /// 1-based ordinal day.
    pub day_of_year: u32,
    /// 365 or 366.
    pub total_days_in_year: u32,
}

impl YearProgress {
    /// Compute progress for a local wall-clock instant.
    ///
    /// Arithmetic runs on wall-clock time, so daylight saving transitions
    /// never shift a day boundary.
    pub fn at(instant: NaiveDateTime) -> Self {
        let year = instant.year();
        let total_days_in_year = days_in_year(year);

        // Jan 1 exists for every year whose instants are representable.
        let start_of_year = NaiveDate::from_yo_opt(year, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(instant);

        let elapsed_ms = instant
            .signed_duration_since(start_of_year)
            .num_milliseconds();
        let total_ms = i64::from(total_days_in_year) * MS_PER_DAY;

        let percentage = elapsed_ms as f64 / total_ms as f64 * 100.0;
        let day_of_year = (elapsed_ms / MS_PER_DAY) as u32 + 1;

        Self {
            year,
            percentage,
            day_of_year,
            total_days_in_year,
        }
    }

    /// Compute progress for a zoned instant, using its local reading.
    pub fn at_zoned<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::at(instant.naive_local())
    }

    /// Whether the year is a leap year.
    pub fn is_leap_year(&self) -> bool {
        self.total_days_in_year == 366
    }

    /// Elapsed fraction in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.percentage / 100.0
    }

    /// Weeks started so far, counting the current partial week.
    pub fn weeks_passed(&self) -> u32 {
        self.day_of_year.div_ceil(7)
    }

    /// Weeks in the year, counting the trailing partial week.
    pub fn total_weeks(&self) -> u32 {
        self.total_days_in_year.div_ceil(7)
    }

    /// Days left after today.
    pub fn days_remaining(&self) -> u32 {
        self.total_days_in_year.saturating_sub(self.day_of_year)
    }

    /// Percentage with two decimals, e.g. `"49.86"`.
    pub fn display_percentage(&self) -> String {
        format!("{:.2}", self.percentage)
    }
}
