//! Next-occurrence calculation for parsed repeat rules.
//!
//! Every search is bounded: daily and yearly rules are computed directly,
//! weekly rules walk at most a week, and monthly rules scan at most
//! `MAX_MONTHLY_SCAN_DAYS` days.

use std::collections::BTreeSet;

use crate::{
    CalendarDate, DateError, FEBRUARY, FEBRUARY_DAYS_LEAP, MAX_MONTH, MAX_MONTHLY_SCAN_DAYS,
    MAX_WEEKDAY, RecurrenceRule,
    types::{DaySelector, Interval, MonthNumber, Weekday},
};

/// Error type for next-occurrence calculation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    /// A date could not be represented (parsing, or a result past year 9999).
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// The rule has no occurrence within the searched window.
    #[error("Repeat rule `{rule}` has no occurrence after {reference}")]
    Unsatisfiable {
        rule:      RecurrenceRule,
        reference: CalendarDate,
    },

    /// The search produced a date that is not after the reference date.
    #[error("Computed date {candidate} is not after reference date {reference}")]
    OrderingViolation {
        candidate: CalendarDate,
        reference: CalendarDate,
    },
}

/// Earliest occurrence of `rule`, counted from `base`, that is strictly after `reference`.
///
/// # Errors
/// `CalcError::InvalidDate` if the occurrence would fall after 9999-12-31,
/// `CalcError::Unsatisfiable` if the rule can never produce a date, and
/// `CalcError::OrderingViolation` if the search returned a date on or before
/// `reference`.
pub fn next(
    base: CalendarDate,
    reference: CalendarDate,
    rule: &RecurrenceRule,
) -> Result<CalendarDate, CalcError> {
    let found = match rule {
        RecurrenceRule::Daily { interval } => Some(daily(base, reference, *interval)?),
        RecurrenceRule::Yearly => Some(yearly(base, reference)?),
        RecurrenceRule::Weekly { weekdays } => weekly(base, reference, weekdays)?,
        RecurrenceRule::Monthly { days, months } => MonthlyScan {
            days,
            months,
            base,
            reference,
        }
        .run()?,
    };

    let candidate = found.ok_or_else(|| CalcError::Unsatisfiable {
        rule: rule.clone(),
        reference,
    })?;

    if candidate <= reference {
        return Err(CalcError::OrderingViolation {
            candidate,
            reference,
        });
    }
    Ok(candidate)
}

/// `base + k * interval` for the smallest `k >= 1` landing after `reference`.
fn daily(
    base: CalendarDate,
    reference: CalendarDate,
    interval: Interval,
) -> Result<CalendarDate, DateError> {
    let step = u64::from(interval.get());
    let steps = match u64::try_from(reference.days_since(base)) {
        Ok(elapsed) => elapsed / step + 1,
        // base is already after reference; it still counts as consumed
        Err(_) => 1,
    };
    base.add_days(steps * step)
}

/// Same month and day in the first later year that lands after `reference`.
///
/// A Feb 29 base is clamped to Feb 28 on its first step (never a leap year)
/// and stays there for every later step.
fn yearly(base: CalendarDate, reference: CalendarDate) -> Result<CalendarDate, DateError> {
    let month = base.month();
    let day = if month == FEBRUARY && base.day() == FEBRUARY_DAYS_LEAP {
        FEBRUARY_DAYS_LEAP - 1
    } else {
        base.day()
    };

    let year = (base.year() + 1).max(reference.year());
    let candidate = CalendarDate::new(year, month, day)?;
    if candidate > reference {
        Ok(candidate)
    } else {
        CalendarDate::new(year + 1, month, day)
    }
}

fn weekly(
    base: CalendarDate,
    reference: CalendarDate,
    weekdays: &BTreeSet<Weekday>,
) -> Result<Option<CalendarDate>, DateError> {
    let mut day = base.max(reference);
    for _ in 0..MAX_WEEKDAY {
        day = day.succ()?;
        if weekdays.iter().any(|w| w.matches(day.weekday())) {
            return Ok(Some(day));
        }
    }
    Ok(None)
}

/// Months a monthly rule may land in.
#[derive(Debug, Clone, Copy)]
enum MonthWindow<'a> {
    Listed(&'a BTreeSet<MonthNumber>),
    /// No month list: every month from `(year, month)` onward
    Since { year: i32, month: u8 },
}

impl MonthWindow<'_> {
    fn admits(self, date: CalendarDate) -> bool {
        match self {
            Self::Listed(months) => months.iter().any(|m| m.get() == date.month()),
            Self::Since { year, month } => (date.year(), date.month()) >= (year, month),
        }
    }
}

#[derive(Debug)]
enum MonthlyState<'a> {
    ResolvingMonths,
    ScanningDays {
        window:    MonthWindow<'a>,
        cursor:    CalendarDate,
        remaining: u32,
    },
    Found(CalendarDate),
}

struct MonthlyScan<'a> {
    days:      &'a BTreeSet<DaySelector>,
    months:    &'a BTreeSet<MonthNumber>,
    base:      CalendarDate,
    reference: CalendarDate,
}

impl<'a> MonthlyScan<'a> {
    fn run(&self) -> Result<Option<CalendarDate>, DateError> {
        if !self.satisfiable() {
            return Ok(None);
        }

        let mut state = MonthlyState::ResolvingMonths;
        loop {
            state = match state {
                MonthlyState::ResolvingMonths => MonthlyState::ScanningDays {
                    window:    self.resolve_months()?,
                    cursor:    self.base.max(self.reference),
                    remaining: MAX_MONTHLY_SCAN_DAYS,
                },
                MonthlyState::ScanningDays { remaining: 0, .. } => return Ok(None),
                MonthlyState::ScanningDays {
                    window,
                    cursor,
                    remaining,
                } => {
                    let day = cursor.succ()?;
                    if day > self.reference && window.admits(day) && self.selects(day) {
                        MonthlyState::Found(day)
                    } else {
                        MonthlyState::ScanningDays {
                            window,
                            cursor: day,
                            remaining: remaining - 1,
                        }
                    }
                },
                MonthlyState::Found(day) => return Ok(Some(day)),
            };
        }
    }

    /// Whether some day selector exists in some admissible month.
    fn satisfiable(&self) -> bool {
        if self.months.is_empty() {
            return !self.days.is_empty();
        }
        self.months
            .iter()
            .any(|m| self.days.iter().any(|d| d.fits_month(m.get())))
    }

    /// True when one of the selectors, resolved against `date`'s own month, is `date`.
    fn selects(&self, date: CalendarDate) -> bool {
        self.days
            .iter()
            .any(|d| d.resolve(date.year(), date.month()) == Some(date.day()))
    }

    /// Uses the listed months, or infers the first month from the anchor date:
    /// the reference date when the base is not after it, else the base date.
    /// The anchor's month is kept while one of its resolved days is still
    /// ahead of the anchor, otherwise the window opens one month later.
    fn resolve_months(&self) -> Result<MonthWindow<'a>, DateError> {
        if !self.months.is_empty() {
            return Ok(MonthWindow::Listed(self.months));
        }

        let anchor = if self.base <= self.reference {
            self.reference
        } else {
            self.base
        };
        let (year, month) = (anchor.year(), anchor.month());
        let pending = self
            .days
            .iter()
            .filter_map(|d| d.resolve(year, month))
            .any(|day| day > anchor.day());

        Ok(if pending {
            MonthWindow::Since { year, month }
        } else if month == MAX_MONTH {
            // validate the roll-over year before scanning into it
            CalendarDate::new(year + 1, 1, 1)?;
            MonthWindow::Since {
                year:  year + 1,
                month: 1,
            }
        } else {
            MonthWindow::Since {
                year,
                month: month + 1,
            }
        })
    }
}
