//! Calendar dates, date-of-birth composition and business-day arithmetic.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Earliest accepted year of birth.
pub const EARLIEST_BIRTH_YEAR: i32 = 1900;

/// Candidates must be at least this many years old (by calendar year).
pub const MINIMUM_CANDIDATE_AGE: i32 = 15;

const ISO_DATE: &str = "%Y-%m-%d";
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A calendar day, normalized to midnight UTC.
///
/// Whatever ISO representation a date is built from, only the calendar day
/// as written survives: time of day and UTC offset are discarded. Two values
/// built from representations of the same day are always equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parses an RFC 3339 date-time, a naive ISO date-time or a plain `YYYY-MM-DD`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(date_time.date_naive()));
        }

        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(date_time) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(date_time.date()));
            }
        }

        NaiveDate::parse_from_str(trimmed, ISO_DATE)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate(input.to_string()))
    }

    /// Builds a date from its components, if they form a real Gregorian day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1 to 12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, starting at 1.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the normalized instant (midnight UTC).
    pub fn to_utc_midnight(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Formats as `YYYY-MM-DD`.
    pub fn to_iso_date_string(&self) -> String {
        self.0.format(ISO_DATE).to_string()
    }

    /// Returns true on Saturdays and Sundays.
    pub fn is_weekend(&self) -> bool {
        matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns true if this day comes strictly before `other`.
    pub fn is_before(&self, other: &CalendarDate) -> bool {
        self < other
    }

    /// Returns true if this day comes strictly after `other`.
    pub fn is_after(&self, other: &CalendarDate) -> bool {
        self > other
    }

    /// Adds (or with a negative count, subtracts) calendar days.
    ///
    /// Returns `None` outside the representable date range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        let next = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        next.map(Self)
    }

    /// Walks back `n` business days, skipping Saturdays and Sundays.
    ///
    /// A negative `n` walks forward instead. The result is never a weekend
    /// day: with `n == 0` a Saturday or Sunday rolls back to the Friday before.
    /// Returns `None` if the walk runs off the representable date range.
    pub fn subtract_business_days(&self, n: i64) -> Option<Self> {
        let direction = if n < 0 { 1 } else { -1 };
        let mut remaining = n.unsigned_abs();
        let mut current = *self;

        while remaining > 0 {
            current = current.add_days(direction)?;
            if !current.is_weekend() {
                remaining -= 1;
            }
        }

        while current.is_weekend() {
            current = current.add_days(direction)?;
        }

        Some(current)
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso_date_string())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Number of days in a month, computed as "day 0 of the following month".
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.checked_add(1)?)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Bounds applied when composing a date of birth from form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOfBirthRules {
    pub earliest_year: i32,
    pub minimum_age_years: i32,
}

impl DateOfBirthRules {
    /// Creates rules from the earliest birth year and the minimum age.
    pub fn new(earliest_year: i32, minimum_age_years: i32) -> Self {
        Self {
            earliest_year,
            minimum_age_years,
        }
    }

    /// Latest accepted year of birth relative to `today`.
    pub fn latest_year(&self, today: CalendarDate) -> i32 {
        today.year().saturating_sub(self.minimum_age_years)
    }

    /// Composes a date of birth from day, month and year text.
    ///
    /// Components are checked year first, then month, then day; the first
    /// invalid component is reported and no date is produced.
    pub fn compose(
        &self,
        day: &str,
        month: &str,
        year: &str,
        today: CalendarDate,
    ) -> Result<CalendarDate, ValidationError> {
        let min = self.earliest_year;
        let max = self.latest_year(today);

        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidYear { min, max })?;
        if year < min || year > max {
            return Err(ValidationError::InvalidYear { min, max });
        }

        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidMonth)?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth);
        }

        let max_day = days_in_month(year, month).ok_or(ValidationError::InvalidMonth)?;
        let day: u32 = day
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidDay { max: max_day })?;
        if day < 1 || day > max_day {
            return Err(ValidationError::InvalidDay { max: max_day });
        }

        CalendarDate::from_ymd(year, month, day).ok_or(ValidationError::InvalidDay { max: max_day })
    }

}

impl Default for DateOfBirthRules {
    fn default() -> Self {
        Self::new(EARLIEST_BIRTH_YEAR, MINIMUM_CANDIDATE_AGE)
    }
}
