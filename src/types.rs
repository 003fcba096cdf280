use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_INTERVAL_DAYS, MAX_MONTH, MAX_MONTH_DAY, MAX_WEEKDAY,
};
use crate::rule::{RuleError, RuleField};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::num::{NonZeroU16, NonZeroU8};

/// Step of a daily rule, guaranteed to be in the range `1..=MAX_INTERVAL_DAYS` (1..=400)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Interval(NonZeroU16);

impl Interval {
    /// Creates a new Interval, validating that it's non-zero and <= `MAX_INTERVAL_DAYS`
    ///
    /// # Errors
    /// Returns `RuleError::InvalidFormat` for the interval field if out of range.
    pub fn new(value: u16) -> Result<Self, RuleError> {
        let non_zero =
            NonZeroU16::new(value).ok_or_else(|| RuleError::invalid(RuleField::Interval, value))?;
        if value > MAX_INTERVAL_DAYS {
            return Err(RuleError::invalid(RuleField::Interval, value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the interval in days
    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl TryFrom<u16> for Interval {
    type Error = RuleError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Interval> for u16 {
    fn from(interval: Interval) -> Self {
        interval.0.get()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weekday in rule numbering: 1 = Monday ... 7 = Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(NonZeroU8);

impl Weekday {
    /// # Errors
    /// Returns `RuleError::InvalidFormat` for the weekday field if outside `1..=7`.
    pub fn new(value: u8) -> Result<Self, RuleError> {
        let non_zero =
            NonZeroU8::new(value).ok_or_else(|| RuleError::invalid(RuleField::Weekday, value))?;
        if value > MAX_WEEKDAY {
            return Err(RuleError::invalid(RuleField::Weekday, value));
        }
        Ok(Self(non_zero))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Position in a Sunday-first week, so Sunday (7) maps to 0.
    /// Matches `chrono::Weekday::num_days_from_sunday`.
    #[inline]
    pub const fn days_from_sunday(self) -> u32 {
        (self.0.get() % MAX_WEEKDAY) as u32
    }

    /// Whether `day` falls on this weekday
    pub fn matches(self, day: chrono::Weekday) -> bool {
        self.days_from_sunday() == day.num_days_from_sunday()
    }
}

impl TryFrom<u8> for Weekday {
    type Error = RuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday.0.get()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthNumber(NonZeroU8);

impl MonthNumber {
    /// Creates a new `MonthNumber`, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `RuleError::InvalidFormat` for the month field if outside `1..=12`.
    pub fn new(value: u8) -> Result<Self, RuleError> {
        let non_zero =
            NonZeroU8::new(value).ok_or_else(|| RuleError::invalid(RuleField::Month, value))?;
        if value > MAX_MONTH {
            return Err(RuleError::invalid(RuleField::Month, value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for MonthNumber {
    type Error = RuleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthNumber> for u8 {
    fn from(month: MonthNumber) -> Self {
        month.0.get()
    }
}

impl fmt::Display for MonthNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day-of-month selector of a monthly rule.
///
/// Positive selectors name a day directly. The two negative selectors count
/// back from the end of the month and only become a concrete day once the
/// month (and, for February, the year) is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum DaySelector {
    /// Explicit day of month, `1..=31`
    Day(NonZeroU8),
    /// `-1`: last day of the month
    Last,
    /// `-2`: second-to-last day of the month
    SecondToLast,
}

impl DaySelector {
    /// # Errors
    /// Returns `RuleError::InvalidFormat` for the month-day field unless the
    /// value is -2, -1 or in `1..=31`.
    pub fn new(value: i8) -> Result<Self, RuleError> {
        match value {
            -1 => Ok(Self::Last),
            -2 => Ok(Self::SecondToLast),
            1.. => u8::try_from(value)
                .ok()
                .filter(|day| *day <= MAX_MONTH_DAY)
                .and_then(NonZeroU8::new)
                .map(Self::Day)
                .ok_or_else(|| RuleError::invalid(RuleField::MonthDay, value)),
            _ => Err(RuleError::invalid(RuleField::MonthDay, value)),
        }
    }

    /// Signed rule value: `-2`, `-1` or `1..=31`
    // explicit days never exceed 31, see `new`
    #[allow(clippy::cast_possible_wrap)]
    pub const fn get(self) -> i8 {
        match self {
            Self::Day(day) => day.get() as i8,
            Self::Last => -1,
            Self::SecondToLast => -2,
        }
    }

    /// Concrete day this selector names in the given month, or `None` if that
    /// month is too short (e.g. day 31 in April).
    pub const fn resolve(self, year: i32, month: u8) -> Option<u8> {
        let length = days_in_month(year, month);
        match self {
            Self::Day(day) if day.get() <= length => Some(day.get()),
            Self::Day(_) => None,
            Self::Last => Some(length),
            Self::SecondToLast => Some(length - 1),
        }
    }

    /// Whether the selector resolves in `month` for at least one year
    pub const fn fits_month(self, month: u8) -> bool {
        match self {
            Self::Day(day) => day.get() <= longest_month(month),
            Self::Last | Self::SecondToLast => true,
        }
    }
}

impl TryFrom<i8> for DaySelector {
    type Error = RuleError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DaySelector> for i8 {
    fn from(selector: DaySelector) -> Self {
        selector.get()
    }
}

impl PartialOrd for DaySelector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DaySelector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get().cmp(&other.get())
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Length of `month` in its longest year (February counts 29)
pub const fn longest_month(month: u8) -> u8 {
    if month == FEBRUARY {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
