use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    LIST_SEPARATOR, MAX_INTERVAL_DAYS, MAX_MONTH, MAX_MONTH_DAY, MAX_WEEKDAY, RULE_DAILY,
    RULE_MONTHLY, RULE_WEEKLY, RULE_YEARLY,
    prelude::*,
    types::{DaySelector, Interval, MonthNumber, Weekday},
};

/// A parsed repeat rule.
///
/// Text forms: `d <interval>`, `y`, `w <weekdays>`, `m <days> [months]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    /// Every `interval` days, counted from the base date
    Daily { interval: Interval },
    /// Every year on the base date's month and day
    Yearly,
    /// On each listed weekday
    Weekly { weekdays: BTreeSet<Weekday> },
    /// On each listed day of month, restricted to `months` unless it is empty
    Monthly {
        days:   BTreeSet<DaySelector>,
        months: BTreeSet<MonthNumber>,
    },
}

/// Which part of a rule failed to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RuleField {
    /// Token count or kind letter
    #[display(fmt = "shape")]
    Shape,
    #[display(fmt = "interval (must be 1-{})", MAX_INTERVAL_DAYS)]
    Interval,
    #[display(fmt = "weekday (must be 1-{})", MAX_WEEKDAY)]
    Weekday,
    #[display(fmt = "day of month (must be -2, -1 or 1-{})", MAX_MONTH_DAY)]
    MonthDay,
    #[display(fmt = "month (must be 1-{})", MAX_MONTH)]
    Month,
}

/// Error type for rule parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid repeat rule {field}: `{value}`")]
    InvalidFormat { field: RuleField, value: String },
}

impl RuleError {
    pub(crate) fn invalid(field: RuleField, value: impl fmt::Display) -> Self {
        Self::InvalidFormat {
            field,
            value: value.to_string(),
        }
    }

    /// The field that failed
    pub const fn field(&self) -> RuleField {
        match self {
            Self::InvalidFormat { field, .. } => *field,
        }
    }

    /// True when the rule text itself is malformed rather than one of its values
    pub const fn is_shape(&self) -> bool {
        matches!(self.field(), RuleField::Shape)
    }
}

/// Parses rule text into a [`RecurrenceRule`].
///
/// # Errors
/// Returns `RuleError::InvalidFormat` naming the field that failed.
pub fn parse(rule_text: &str) -> Result<RecurrenceRule, RuleError> {
    rule_text.parse()
}

impl FromStr for RecurrenceRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_ascii_whitespace().collect();

        match tokens.as_slice() {
            [RULE_DAILY, interval] => {
                let interval = Interval::new(parse_number(interval, RuleField::Interval)?)?;
                Ok(Self::Daily { interval })
            },
            [RULE_YEARLY] => Ok(Self::Yearly),
            [RULE_WEEKLY, weekdays] => {
                let weekdays = parse_list(weekdays, RuleField::Weekday, Weekday::new)?;
                Ok(Self::Weekly { weekdays })
            },
            [RULE_MONTHLY, days] => Ok(Self::Monthly {
                days:   parse_list(days, RuleField::MonthDay, DaySelector::new)?,
                months: BTreeSet::new(),
            }),
            [RULE_MONTHLY, days, months] => Ok(Self::Monthly {
                days:   parse_list(days, RuleField::MonthDay, DaySelector::new)?,
                months: parse_list(months, RuleField::Month, MonthNumber::new)?,
            }),
            _ => Err(RuleError::invalid(RuleField::Shape, s.trim())),
        }
    }
}

/// Parses one integer and narrows it to the field's width.
/// Non-integers and out-of-width values both fail as `field`.
fn parse_number<N: TryFrom<i64>>(token: &str, field: RuleField) -> Result<N, RuleError> {
    token
        .parse::<i64>()
        .ok()
        .and_then(|n| N::try_from(n).ok())
        .ok_or_else(|| RuleError::invalid(field, token))
}

fn parse_list<N, T, F>(token: &str, field: RuleField, make: F) -> Result<BTreeSet<T>, RuleError>
where
    N: TryFrom<i64>,
    T: Ord,
    F: Fn(N) -> Result<T, RuleError>,
{
    token
        .split(LIST_SEPARATOR)
        .map(|item| make(parse_number(item, field)?))
        .collect()
}

fn join<T: fmt::Display>(items: &BTreeSet<T>) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily { interval } => write!(f, "{RULE_DAILY} {interval}"),
            Self::Yearly => f.write_str(RULE_YEARLY),
            Self::Weekly { weekdays } => write!(f, "{RULE_WEEKLY} {}", join(weekdays)),
            Self::Monthly { days, months } if months.is_empty() => {
                write!(f, "{RULE_MONTHLY} {}", join(days))
            },
            Self::Monthly { days, months } => {
                write!(f, "{RULE_MONTHLY} {} {}", join(days), join(months))
            },
        }
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
