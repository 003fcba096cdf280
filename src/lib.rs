mod calc;
mod consts;
mod engine;
mod prelude;
mod rule;
mod schedule;
mod types;

pub use calc::{CalcError, next};
pub use consts::*;
pub use engine::{DateRole, EngineError, RecurrenceRequest, next_occurrence};
pub use rule::{RecurrenceRule, RuleError, RuleField, parse};
pub use schedule::{Completion, complete, initial_date, validate_repeat};
pub use types::{DaySelector, Interval, MonthNumber, Weekday, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A calendar date without time of day or zone, limited to years `1..=9999`.
/// Its text form is `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}", "_0.format(DATE_FORMAT)")]
pub struct CalendarDate(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0:?} (expected YYYYMMDD)")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a date from its components
    ///
    /// # Errors
    /// Returns the `DateError` for the first component that is out of range.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::validate_year(year)?;
        if month == 0 || month > MAX_MONTH {
            return Err(DateError::InvalidMonth(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        NaiveDate::from_ymd_opt(year, month.into(), day.into())
            .map(Self)
            .ok_or(DateError::InvalidDay { year, month, day })
    }

    /// Wraps a `chrono` date, rejecting years outside `1..=9999`
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` for out-of-range years.
    pub fn from_naive(date: NaiveDate) -> Result<Self, DateError> {
        Self::validate_year(date.year())?;
        Ok(Self(date))
    }

    const fn validate_year(year: i32) -> Result<(), DateError> {
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(DateError::InvalidYear(year));
        }
        Ok(())
    }

    /// The underlying `chrono` date
    #[inline]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    // month() is 1..=12 and day() is 1..=31
    #[allow(clippy::cast_possible_truncation)]
    pub fn month(self) -> u8 {
        self.0.month() as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn day(self) -> u8 {
        self.0.day() as u8
    }

    pub fn weekday(self) -> chrono::Weekday {
        self.0.weekday()
    }

    /// Date `days` days later
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the result passes year 9999.
    pub fn add_days(self, days: u64) -> Result<Self, DateError> {
        self.0
            .checked_add_days(Days::new(days))
            .ok_or(DateError::InvalidYear(MAX_YEAR + 1))
            .and_then(Self::from_naive)
    }

    /// The following day
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` after 9999-12-31.
    pub fn succ(self) -> Result<Self, DateError> {
        self.add_days(1)
    }

    /// Signed number of days from `earlier` to `self`
    pub fn days_since(self, earlier: Self) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }

    /// Parses one fixed-width numeric field of the text form
    fn parse_field<N: FromStr>(s: &str, range: std::ops::Range<usize>) -> Result<N, DateError> {
        s.get(range)
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| DateError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DATE_TEXT_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidFormat(s.to_owned()));
        }

        let year: i32 = Self::parse_field(s, 0..4)?;
        let month: u8 = Self::parse_field(s, 4..6)?;
        let day: u8 = Self::parse_field(s, 6..8)?;

        Self::new(year, month, day)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = DateError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_naive(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
